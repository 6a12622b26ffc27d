//! Connection management for SqliteStore.

use super::SqliteStore;
use super::transaction::Transaction;
use crate::store::{StoreError, StoreResult, StoreSource, create_schema};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

impl SqliteStore {
    /// Opens an in-memory SQLite database with the todo schema.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens or creates a SQLite database at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the schema
    /// if this is a new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Returns a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Starts a write transaction; see [`Transaction`].
    pub fn transaction(&mut self) -> StoreResult<Transaction<'_>> {
        Transaction::begin(&mut self.conn)
    }
}

/// Location of a todo database file.
///
/// Each `connect()` opens a fresh connection that is closed when the
/// returned store is dropped.
#[derive(Debug, Clone)]
pub struct TodoDb {
    path: PathBuf,
}

impl TodoDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the database file, its parent directories and the schema.
    pub fn init(&self) -> StoreResult<()> {
        SqliteStore::open(&self.path).map(drop)
    }
}

impl StoreSource for TodoDb {
    type Store = SqliteStore;

    fn connect(&self) -> StoreResult<SqliteStore> {
        SqliteStore::open(&self.path)
    }
}
