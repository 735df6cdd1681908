//! Common test infrastructure
//!
//! Builds small song/log datasets on disk and opens a store over a temp
//! database, the way the `sparkify-etl` binary does.

mod constants;
mod fixtures;

pub use constants::*;
pub use fixtures::{log_event, song_record, TestDataset};
