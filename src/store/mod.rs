//! Todo persistence: repository trait, schema and the SQLite store.

mod repository;
mod schema;
mod sqlite;

pub use repository::{StoreError, StoreResult, StoreSource, TodoRepository};
pub use schema::{create_schema, get_schema_version, rebuild_fts};
pub use sqlite::{SqliteStore, TodoDb, Transaction};
