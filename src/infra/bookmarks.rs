//! Bookmark manager interop.
//!
//! Bookmarks added by this tool carry the managed tag, and only those are
//! ever deleted again.

use crate::domain::TagSet;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info};

/// Tag marking bookmarks owned by this tool, in store form.
pub const MANAGED_TAG: &str = ",todomark,";

static URL_IN_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"https?://[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9]{1,6}\b[-a-zA-Z0-9@:%_+.~#?&/=]*",
    )
    .expect("url pattern is valid")
});

/// Errors from bookmark operations.
#[derive(Debug, Error)]
pub enum BookmarkError {
    #[error("cannot extract url from: {0}")]
    NoUrl(String),

    #[error("bookmark database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// The bookmark operations this tool needs.
pub trait BookmarkStore {
    /// Adds a bookmark; `None` when the URL is already bookmarked.
    fn add(&mut self, url: &str, tags: &str) -> Result<Option<i64>, BookmarkError>;

    /// Exact URL lookup.
    fn find_by_url(&self, url: &str) -> Result<Option<i64>, BookmarkError>;

    /// Tags of a bookmark in store form.
    fn tags_of(&self, id: i64) -> Result<Option<String>, BookmarkError>;

    /// Removes a bookmark; false when it did not exist.
    fn delete(&mut self, id: i64) -> Result<bool, BookmarkError>;
}

/// Outcome of [`delete_bookmark_in_line`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unbookmark {
    Deleted { id: i64, url: String },
    NotFound { url: String },
    NotManaged { id: i64, url: String },
}

/// Bookmarks `url` with the managed tag.
pub fn bookmark_url<B>(store: &mut B, url: &str) -> Result<Option<i64>, BookmarkError>
where
    B: BookmarkStore + ?Sized,
{
    let id = store.add(url, MANAGED_TAG)?;
    match id {
        Some(id) => info!(id, url, "bookmarked"),
        None => debug!(url, "already bookmarked"),
    }
    Ok(id)
}

/// First http(s) URL in a line of text.
pub fn extract_url(line: &str) -> Option<&str> {
    URL_IN_LINE.find(line).map(|m| m.as_str())
}

/// Deletes the bookmark for the first URL in `line`, if this tool owns it.
pub fn delete_bookmark_in_line<B>(store: &mut B, line: &str) -> Result<Unbookmark, BookmarkError>
where
    B: BookmarkStore + ?Sized,
{
    let url = extract_url(line)
        .ok_or_else(|| BookmarkError::NoUrl(line.to_string()))?
        .to_string();

    let Some(id) = store.find_by_url(&url)? else {
        debug!(url = %url, "not bookmarked");
        return Ok(Unbookmark::NotFound { url });
    };

    let managed = store
        .tags_of(id)?
        .is_some_and(|tags| TagSet::parse_list(&tags).contains(MANAGED_TAG.trim_matches(',')));
    if !managed {
        debug!(id, url = %url, "bookmark not managed, keeping it");
        return Ok(Unbookmark::NotManaged { id, url });
    }

    store.delete(id)?;
    info!(id, url = %url, "deleted bookmark");
    Ok(Unbookmark::Deleted { id, url })
}

/// Bookmarks kept in a SQLite `bookmarks` table.
///
/// The table layout matches the common bookmark manager layout (`id`,
/// `URL`, `metadata`, `tags`, `desc`, `flags`), so an existing database can
/// be shared.
pub struct SqliteBookmarks {
    conn: Connection,
}

impl SqliteBookmarks {
    pub fn open(path: &Path) -> Result<Self, BookmarkError> {
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, BookmarkError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, BookmarkError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bookmarks (
                id INTEGER PRIMARY KEY,
                URL TEXT NOT NULL UNIQUE,
                metadata TEXT DEFAULT '',
                tags TEXT DEFAULT ',',
                \"desc\" TEXT DEFAULT '',
                flags INTEGER DEFAULT 0
            );",
        )?;
        Ok(Self { conn })
    }
}

impl BookmarkStore for SqliteBookmarks {
    fn add(&mut self, url: &str, tags: &str) -> Result<Option<i64>, BookmarkError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO bookmarks (URL, tags) VALUES (?1, ?2)",
            params![url, tags],
        )?;
        Ok((changed > 0).then(|| self.conn.last_insert_rowid()))
    }

    fn find_by_url(&self, url: &str) -> Result<Option<i64>, BookmarkError> {
        Ok(self
            .conn
            .query_row("SELECT id FROM bookmarks WHERE URL = ?1", [url], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn tags_of(&self, id: i64) -> Result<Option<String>, BookmarkError> {
        Ok(self
            .conn
            .query_row("SELECT tags FROM bookmarks WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?)
    }

    fn delete(&mut self, id: i64) -> Result<bool, BookmarkError> {
        Ok(self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", [id])?
            > 0)
    }
}
