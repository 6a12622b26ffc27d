//! SQLite schema creation for the todo store.

use rusqlite::Connection;

/// Creates the database schema for the todo store.
///
/// Idempotent - calling it on an existing database is safe.
///
/// # Tables Created
/// - `todos` - Todo rows, `parent_id` referencing `todos(id)`
/// - `todos_fts` - FTS5 shadow index over the text columns
/// - `schema_version` - Schema version tracking
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS todos (
            id INTEGER PRIMARY KEY,
            parent_id INTEGER REFERENCES todos(id) ON DELETE SET NULL,
            todo TEXT NOT NULL,
            metadata TEXT NOT NULL DEFAULT '',
            tags TEXT NOT NULL DEFAULT ',,',
            \"desc\" TEXT NOT NULL DEFAULT '',
            path TEXT NOT NULL DEFAULT '',
            flags INTEGER NOT NULL DEFAULT 1,
            last_update_ts TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            created_at TEXT NOT NULL
        );",
    )?;

    conn.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_todos_parent ON todos(parent_id);
         CREATE INDEX IF NOT EXISTS idx_todos_todo ON todos(todo);",
    )?;

    // Column names must match the todos table for rebuild to work
    conn.execute_batch(
        "CREATE VIRTUAL TABLE IF NOT EXISTS todos_fts USING fts5(
            todo,
            metadata,
            tags,
            \"desc\",
            path,
            content='todos',
            content_rowid='id',
            tokenize='porter unicode61'
        );",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS todos_fts_insert
        AFTER INSERT ON todos BEGIN
            INSERT INTO todos_fts(rowid, todo, metadata, tags, \"desc\", path)
            VALUES (NEW.id, NEW.todo, NEW.metadata, NEW.tags, NEW.\"desc\", NEW.path);
        END;",
    )?;

    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS todos_fts_delete
        AFTER DELETE ON todos BEGIN
            INSERT INTO todos_fts(todos_fts, rowid, todo, metadata, tags, \"desc\", path)
            VALUES ('delete', OLD.id, OLD.todo, OLD.metadata, OLD.tags, OLD.\"desc\", OLD.path);
        END;",
    )?;

    // Only text columns feed the index; a flags or parent change leaves it alone
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS todos_fts_update
        AFTER UPDATE OF todo, metadata, tags, \"desc\", path ON todos BEGIN
            INSERT INTO todos_fts(todos_fts, rowid, todo, metadata, tags, \"desc\", path)
            VALUES ('delete', OLD.id, OLD.todo, OLD.metadata, OLD.tags, OLD.\"desc\", OLD.path);
            INSERT INTO todos_fts(rowid, todo, metadata, tags, \"desc\", path)
            VALUES (NEW.id, NEW.todo, NEW.metadata, NEW.tags, NEW.\"desc\", NEW.path);
        END;",
    )?;

    // Older databases carried a self-updating timestamp trigger; the
    // repository now sets last_update_ts in its own UPDATE.
    conn.execute_batch("DROP TRIGGER IF EXISTS todos_touch;")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'))",
        [],
    )?;

    Ok(())
}

/// Returns the current schema version.
pub fn get_schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get(0)
    })
}

/// Rebuilds the FTS5 index from the todos table.
///
/// Recovers from index corruption or bulk writes that bypassed the
/// triggers.
pub fn rebuild_fts(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute("INSERT INTO todos_fts(todos_fts) VALUES('rebuild')", [])?;
    Ok(())
}
