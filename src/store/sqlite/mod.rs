//! SQLite-backed todo store implementation.

mod connection;
mod repo_impl;
mod transaction;


use rusqlite::Connection;

pub use connection::TodoDb;
pub use transaction::Transaction;

// ===========================================
// SqliteStore Struct
// ===========================================

/// SQLite-backed todo store.
///
/// Owns one connection; dropping the store closes it.
pub struct SqliteStore {
    pub(crate) conn: Connection,
}
