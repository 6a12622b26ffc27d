//! Persisted todo records.

use crate::domain::{TagSet, TodoId, TodoStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A todo as stored, always carrying its store-assigned id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Todo {
    pub id: TodoId,
    pub parent_id: Option<TodoId>,
    pub todo: String,
    pub metadata: String,
    pub tags: TagSet,
    pub desc: String,
    pub path: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub last_update_ts: DateTime<Utc>,
}

/// A todo that has not been inserted yet.
///
/// # Examples
///
/// ```
/// use todomark::domain::{NewTodo, TodoStatus};
///
/// let new = NewTodo::new("write docs").status(TodoStatus::Progress).path("notes.md");
/// assert_eq!(new.todo, "write docs");
/// assert_eq!(new.status, TodoStatus::Progress);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewTodo {
    pub parent_id: Option<TodoId>,
    pub todo: String,
    pub metadata: String,
    pub tags: TagSet,
    pub desc: String,
    pub path: String,
    pub status: TodoStatus,
}

impl NewTodo {
    /// Starts a new open todo with the given text.
    pub fn new(todo: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            todo: todo.into(),
            metadata: String::new(),
            tags: TagSet::new(),
            desc: String::new(),
            path: String::new(),
            status: TodoStatus::Open,
        }
    }

    pub fn parent(mut self, parent_id: Option<TodoId>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn status(mut self, status: TodoStatus) -> Self {
        self.status = status;
        self
    }

    pub fn metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }
}
