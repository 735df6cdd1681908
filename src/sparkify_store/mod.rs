mod models;
mod schema;
mod store;
mod trait_def;

pub use models::*;
pub use schema::{SchemaRegistry, SPARKIFY_SCHEMA};
pub use store::SqliteSparkifyStore;
#[cfg(feature = "mock")]
pub use trait_def::MockSparkifyStore;
pub use trait_def::SparkifyStore;
