mod table_schema;

pub use table_schema::{Column, Schema, SqlType, Table};
