//! Sparkify ETL Library
//!
//! Loads the Sparkify song and event log datasets into a SQLite star schema.

pub mod batch;
pub mod config;
pub mod extract;
pub mod loader;
pub mod sparkify_store;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use batch::{process_data, run, RunSummary};
pub use config::{CliConfig, EtlConfig, FileConfig};
pub use sparkify_store::{SchemaRegistry, SparkifyStore, SqliteSparkifyStore};
