//! Core types: TodoId, TodoStatus, Tag, Todo, TodoLine

mod line;
mod status;
mod tag;
mod todo;
mod todo_id;

pub use line::{TodoLine, escape_percent};
pub use status::{TodoStatus, UnknownFlagError};
pub use tag::{ParseTagError, Tag, TagSet};
pub use todo::{NewTodo, Todo};
pub use todo_id::{ParseTodoIdError, TodoId};
