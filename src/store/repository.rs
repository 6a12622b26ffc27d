//! TodoRepository trait, connection source and error types.

use crate::domain::{NewTodo, Todo, TodoId, TodoStatus};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested todo does not exist.
    #[error("todo not found: {id}")]
    TodoNotFound { id: TodoId },

    /// An ancestor lookup did not resolve to exactly one row.
    #[error(
        "DB inconsistency: ancestor of todo {id} at depth {depth} is ambiguous ({found} rows); clear the inconsistency"
    )]
    AmbiguousAncestry {
        id: TodoId,
        depth: usize,
        found: usize,
    },

    /// A required field was empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A stored row could not be decoded.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The full-text query was rejected.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository for persisted todos.
///
/// Every mutating method commits before it returns; no transaction spans
/// more than one call.
pub trait TodoRepository {
    /// Inserts a new todo and returns its assigned id.
    fn insert(&mut self, todo: &NewTodo) -> StoreResult<TodoId>;

    /// Replaces the mutable fields of an existing row.
    ///
    /// Returns `StoreError::TodoNotFound` if no row has `todo.id`.
    fn update(&mut self, todo: &Todo) -> StoreResult<TodoId>;

    /// Removes a todo, returning the removed row (idempotent).
    fn delete(&mut self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Full-text search, best match first.
    ///
    /// An empty query returns every row ordered by id. No match is an
    /// empty vector.
    fn find_by_text(&self, query: &str) -> StoreResult<Vec<Todo>>;

    /// Todos whose text equals `body`, ignoring leading and trailing
    /// spaces and tabs on both sides. Ordered by id.
    fn find_by_body(&self, body: &str) -> StoreResult<Vec<Todo>>;

    /// Retrieves a todo by id.
    fn get_by_id(&self, id: TodoId) -> StoreResult<Option<Todo>>;

    /// Number of ancestor hops from `id` to its root; 0 for roots and
    /// unknown ids.
    fn depth_of(&self, id: TodoId) -> StoreResult<usize>;

    /// The ancestor of `id` (or `id` itself) sitting at `depth`.
    ///
    /// Anything other than exactly one matching row is
    /// `StoreError::AmbiguousAncestry`.
    fn parent_at_depth(&self, id: TodoId, depth: usize) -> StoreResult<Todo>;

    /// Ids on the path from `id` up to its root, starting with `id`.
    fn ancestors(&self, id: TodoId) -> StoreResult<Vec<TodoId>>;

    /// Lists all todos ordered by id.
    fn list_all(&self) -> StoreResult<Vec<Todo>>;

    /// Distinct tags across all todos, sorted.
    fn all_tags(&self) -> StoreResult<Vec<String>>;

    /// Distinct tags of the todos carrying `tag`, sorted (includes `tag`).
    fn related_tags(&self, tag: &str) -> StoreResult<Vec<String>>;

    /// Least advanced status among the direct children of `id`, or `None`
    /// when it has no children.
    fn overall_status(&self, id: TodoId) -> StoreResult<Option<TodoStatus>>;
}

/// Something that can open a scoped store connection.
///
/// Callers open a store per operation and let it drop afterwards, so no
/// connection outlives a single reconciliation step.
pub trait StoreSource {
    type Store: TodoRepository;

    fn connect(&self) -> StoreResult<Self::Store>;
}

impl<T: StoreSource + ?Sized> StoreSource for &T {
    type Store = T::Store;

    fn connect(&self) -> StoreResult<Self::Store> {
        (**self).connect()
    }
}
