//! TodoRepository trait implementation for SqliteStore.

use super::SqliteStore;
use crate::domain::{NewTodo, TagSet, Todo, TodoId, TodoStatus};
use crate::store::{StoreError, StoreResult, TodoRepository};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::BTreeSet;

/// Upper bound on ancestor hops walked by the recursive queries.
const MAX_HOPS: i64 = 1024;

const SELECT_TODO: &str = "SELECT t.id, t.parent_id, t.todo, t.metadata, t.tags, t.\"desc\",
        t.path, t.flags, t.last_update_ts, t.created_at
     FROM todos t";

/// Ancestor chain of ?1 as (id, parent_id, hops), bounded by ?2 hops.
const ANCESTOR_CHAIN: &str = "WITH RECURSIVE chain(id, parent_id, hops) AS (
        SELECT id, parent_id, 0 FROM todos WHERE id = ?1
        UNION ALL
        SELECT t.id, t.parent_id, chain.hops + 1
        FROM todos t JOIN chain ON t.id = chain.parent_id
        WHERE chain.hops < ?2
    )";

/// A todos row before field decoding.
struct TodoRow {
    id: i64,
    parent_id: Option<i64>,
    todo: String,
    metadata: String,
    tags: String,
    desc: String,
    path: String,
    flags: i64,
    last_update_ts: String,
    created_at: String,
}

impl TodoRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            todo: row.get(2)?,
            metadata: row.get(3)?,
            tags: row.get(4)?,
            desc: row.get(5)?,
            path: row.get(6)?,
            flags: row.get(7)?,
            last_update_ts: row.get(8)?,
            created_at: row.get(9)?,
        })
    }

    fn into_todo(self) -> StoreResult<Todo> {
        let status = TodoStatus::from_flags(self.flags)
            .map_err(|e| StoreError::InvalidRow(format!("todo {}: {}", self.id, e)))?;

        Ok(Todo {
            id: TodoId::new(self.id),
            parent_id: self.parent_id.map(TodoId::new),
            todo: self.todo,
            metadata: self.metadata,
            tags: TagSet::parse_list(&self.tags),
            desc: self.desc,
            path: self.path,
            status,
            last_update_ts: parse_timestamp(&self.last_update_ts)?,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

/// Parses RFC 3339, falling back to SQLite's `CURRENT_TIMESTAMP` format.
fn parse_timestamp(value: &str) -> StoreResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StoreError::InvalidRow(format!("invalid timestamp '{}': {}", value, e)))
}

fn fetch_todo(conn: &Connection, id: TodoId) -> StoreResult<Option<Todo>> {
    let row = conn
        .query_row(
            &format!("{SELECT_TODO} WHERE t.id = ?1"),
            [id.get()],
            TodoRow::from_row,
        )
        .optional()?;
    row.map(TodoRow::into_todo).transpose()
}

fn collect_todos(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> StoreResult<Vec<Todo>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, TodoRow::from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(TodoRow::into_todo).collect()
}

/// The MATCH statement text is fixed, so a generic `SQLITE_ERROR` while
/// running it can only come from the query expression.
fn map_fts_error(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == rusqlite::ErrorCode::Unknown =>
        {
            StoreError::InvalidQuery(format!("invalid FTS query: {}", e))
        }
        e => StoreError::Database(e),
    }
}

fn collect_tags<'a>(store_forms: impl Iterator<Item = &'a str>) -> Vec<String> {
    let tags: BTreeSet<String> = store_forms
        .flat_map(|s| {
            TagSet::parse_list(s)
                .iter()
                .map(|t| t.as_str().to_string())
                .collect::<Vec<_>>()
        })
        .collect();
    tags.into_iter().collect()
}

impl TodoRepository for SqliteStore {
    fn insert(&mut self, todo: &NewTodo) -> StoreResult<TodoId> {
        if todo.todo.trim().is_empty() {
            return Err(StoreError::MissingField("todo"));
        }

        self.conn.execute(
            "INSERT INTO todos (parent_id, todo, metadata, tags, \"desc\", path, flags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                todo.parent_id.map(TodoId::get),
                todo.todo,
                todo.metadata,
                todo.tags.to_store_string(),
                todo.desc,
                todo.path,
                todo.status.flags(),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(TodoId::new(self.conn.last_insert_rowid()))
    }

    fn update(&mut self, todo: &Todo) -> StoreResult<TodoId> {
        let changed = self.conn.execute(
            "UPDATE todos SET parent_id = ?2, todo = ?3, metadata = ?4, tags = ?5,
                 \"desc\" = ?6, path = ?7, flags = ?8,
                 last_update_ts = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
             WHERE id = ?1",
            params![
                todo.id.get(),
                todo.parent_id.map(TodoId::get),
                todo.todo,
                todo.metadata,
                todo.tags.to_store_string(),
                todo.desc,
                todo.path,
                todo.status.flags(),
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::TodoNotFound { id: todo.id });
        }
        Ok(todo.id)
    }

    fn delete(&mut self, id: TodoId) -> StoreResult<Option<Todo>> {
        let tx = self.transaction()?;

        let existing = fetch_todo(tx.conn(), id)?;
        if existing.is_some() {
            tx.execute("DELETE FROM todos WHERE id = ?1", [id.get()])?;
        }

        tx.commit()?;
        Ok(existing)
    }

    fn find_by_text(&self, query: &str) -> StoreResult<Vec<Todo>> {
        if query.trim().is_empty() {
            return self.list_all();
        }

        let sql = format!(
            "{SELECT_TODO}
             JOIN todos_fts ON todos_fts.rowid = t.id
             WHERE todos_fts MATCH ?1
             ORDER BY bm25(todos_fts)"
        );
        let mut stmt = self.conn.prepare(&sql).map_err(map_fts_error)?;
        let rows = stmt
            .query_map([query], TodoRow::from_row)
            .map_err(map_fts_error)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(map_fts_error)?;

        rows.into_iter().map(TodoRow::into_todo).collect()
    }

    fn find_by_body(&self, body: &str) -> StoreResult<Vec<Todo>> {
        collect_todos(
            &self.conn,
            &format!("{SELECT_TODO} WHERE trim(t.todo, char(32, 9)) = ?1 ORDER BY t.id"),
            [body.trim_matches([' ', '\t'])],
        )
    }

    fn get_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>> {
        fetch_todo(&self.conn, id)
    }

    fn depth_of(&self, id: TodoId) -> StoreResult<usize> {
        let depth: Option<i64> = self.conn.query_row(
            &format!("{ANCESTOR_CHAIN} SELECT MAX(hops) FROM chain"),
            params![id.get(), MAX_HOPS],
            |row| row.get(0),
        )?;
        Ok(depth.map_or(0, |d| d as usize))
    }

    fn parent_at_depth(&self, id: TodoId, depth: usize) -> StoreResult<Todo> {
        let mut stmt = self.conn.prepare(&format!(
            "{ANCESTOR_CHAIN}
             SELECT id FROM chain WHERE (SELECT MAX(hops) FROM chain) - hops = ?3"
        ))?;
        let ids = stmt
            .query_map(params![id.get(), MAX_HOPS, depth as i64], |row| {
                row.get::<_, i64>(0)
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        match ids.as_slice() {
            [ancestor] => fetch_todo(&self.conn, TodoId::new(*ancestor))?.ok_or(
                StoreError::TodoNotFound {
                    id: TodoId::new(*ancestor),
                },
            ),
            _ => Err(StoreError::AmbiguousAncestry {
                id,
                depth,
                found: ids.len(),
            }),
        }
    }

    fn ancestors(&self, id: TodoId) -> StoreResult<Vec<TodoId>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ANCESTOR_CHAIN} SELECT id FROM chain ORDER BY hops"))?;
        let ids = stmt
            .query_map(params![id.get(), MAX_HOPS], |row| row.get::<_, i64>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(ids.into_iter().map(TodoId::new).collect())
    }

    fn list_all(&self) -> StoreResult<Vec<Todo>> {
        collect_todos(&self.conn, &format!("{SELECT_TODO} ORDER BY t.id"), [])
    }

    fn all_tags(&self) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT tags FROM todos")?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(collect_tags(rows.iter().map(String::as_str)))
    }

    fn related_tags(&self, tag: &str) -> StoreResult<Vec<String>> {
        let needle = format!(",{},", tag.trim());
        let mut stmt = self
            .conn
            .prepare("SELECT tags FROM todos WHERE instr(tags, ?1) > 0")?;
        let rows = stmt
            .query_map([needle], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(collect_tags(rows.iter().map(String::as_str)))
    }

    fn overall_status(&self, id: TodoId) -> StoreResult<Option<TodoStatus>> {
        let min_flags: Option<i64> = self.conn.query_row(
            "SELECT MIN(flags) FROM todos WHERE parent_id = ?1",
            [id.get()],
            |row| row.get(0),
        )?;

        min_flags
            .map(|flags| {
                TodoStatus::from_flags(flags)
                    .map_err(|e| StoreError::InvalidRow(format!("child of todo {}: {}", id, e)))
            })
            .transpose()
    }
}
