//! Command handlers for the CLI.

mod completions;
mod open;
mod reconcile;
mod search;
mod todos;

#[cfg(test)]
pub(crate) mod tests;

use anyhow::{Context, Result};

use crate::domain::{Todo, TodoLine};
use crate::store::{SqliteStore, StoreSource, TodoDb};

// Re-export public items
pub use completions::handle_completions;
pub use open::{handle_mime, handle_open, handle_unbookmark};
pub use reconcile::handle_reconcile;
pub use search::{handle_search, handle_show, handle_tags};
pub use todos::{handle_create, handle_delete, handle_load};

// Re-export for tests
#[cfg(test)]
pub(crate) use open::{EditorLauncher, Opened, handle_open_impl};
#[cfg(test)]
pub(crate) use reconcile::{collect_files, reconcile_text};
#[cfg(test)]
pub(crate) use search::{search_todos, todo_detail};
#[cfg(test)]
pub(crate) use todos::load_lines;

// ===========================================
// Shared Utilities
// ===========================================

pub(crate) fn open_store(db: &TodoDb) -> Result<SqliteStore> {
    db.connect()
        .with_context(|| format!("failed to open todo database at {}", db.path().display()))
}

/// One-line listing of a todo in its buffer form.
pub(crate) fn format_todo(todo: &Todo) -> String {
    TodoLine::from_todo(todo, 0).render()
}
