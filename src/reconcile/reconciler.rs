//! Per-line reconciliation against the todo store.

use super::{RunningBlock, resolve_parent};
use crate::domain::{NewTodo, Todo, TodoId, TodoLine, TodoStatus};
use crate::store::{StoreError, StoreResult, StoreSource, TodoRepository};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a reconciliation.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// More than one active todo would share the same text.
    #[error(
        "DB inconsistency: same active todo already exists: {}; clear the inconsistency",
        join_ids(.ids)
    )]
    DuplicateActive { ids: Vec<TodoId> },

    /// Plain text that would not render back as a todo line.
    #[error("todo text cannot contain braces or line breaks: {0:?}")]
    InvalidBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for reconciliation.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

fn join_ids(ids: &[TodoId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Which direction state flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Buffer is the source of truth; the store is updated.
    Write,
    /// Store is the source of truth; the line is repainted.
    Read,
}

/// What the walker does with a reconciled line.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Emit(TodoLine),
    Drop,
}

/// Reconciles single todo lines against a store.
///
/// Every call opens its own connection from the source and releases it
/// before returning.
#[derive(Debug, Clone)]
pub struct Reconciler<S> {
    source: S,
    path: String,
}

impl<S: StoreSource> Reconciler<S> {
    /// `path` is recorded as provenance on the todos this reconciler writes.
    pub fn new(source: S, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reconciles one parsed line given the lines already emitted in its
    /// block.
    pub fn reconcile(
        &self,
        line: TodoLine,
        block: &RunningBlock,
        mode: Mode,
    ) -> ReconcileResult<Decision> {
        let mut store = self.source.connect()?;
        match mode {
            Mode::Write => self.write(&mut store, line, block),
            Mode::Read => self.read(&mut store, line, block),
        }
    }

    fn write(
        &self,
        store: &mut S::Store,
        mut line: TodoLine,
        block: &RunningBlock,
    ) -> ReconcileResult<Decision> {
        let parent = resolve_parent(&*store, &line, block)?;

        if line.status() == TodoStatus::ToDelete {
            if let Some(id) = line.code()
                && store.delete(id)?.is_some()
            {
                info!(id = %id, "deleted todo");
            }
            return Ok(Decision::Drop);
        }

        let Some(id) = line.code() else {
            let id = self.create(store, &line, parent)?;
            line.set_code(id);
            return Ok(Decision::Emit(line));
        };

        let Some(mut todo) = store.get_by_id(id)? else {
            warn!(id = %id, "todo not in store, dropping line");
            return Ok(Decision::Drop);
        };

        todo.todo = line.body().to_string();
        todo.status = line.status();
        todo.path = self.path.clone();
        todo.parent_id = parent;
        todo.tags = line.tags().clone();

        match store.update(&todo) {
            Ok(_) => {
                debug!(id = %id, parent = ?parent, status = %todo.status, "updated todo");
                Ok(Decision::Emit(line))
            }
            Err(StoreError::TodoNotFound { .. }) => {
                warn!(id = %id, "todo vanished during update, dropping line");
                Ok(Decision::Drop)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn read(
        &self,
        store: &mut S::Store,
        mut line: TodoLine,
        block: &RunningBlock,
    ) -> ReconcileResult<Decision> {
        if line.status() == TodoStatus::ToDelete {
            return Ok(Decision::Emit(line));
        }

        let Some(id) = line.code() else {
            // First materialization of a document that was never written
            debug!(body = line.body(), "creating todo in read mode");
            let parent = resolve_parent(&*store, &line, block)?;
            let id = self.create(store, &line, parent)?;
            line.set_code(id);
            return Ok(Decision::Emit(line));
        };

        let Some(todo) = store.get_by_id(id)? else {
            warn!(id = %id, "todo not in store, dropping line");
            return Ok(Decision::Drop);
        };

        line.set_body(todo.todo);
        line.set_status(todo.status);
        line.set_depth(store.depth_of(id)?);
        line.set_tags(todo.tags);
        debug!(id = %id, depth = line.depth(), "repainted line from store");
        Ok(Decision::Emit(line))
    }

    fn create(
        &self,
        store: &mut S::Store,
        line: &TodoLine,
        parent: Option<TodoId>,
    ) -> ReconcileResult<TodoId> {
        let duplicates = active_duplicates(&*store, line.body())?;
        if !duplicates.is_empty() {
            return Err(ReconcileError::DuplicateActive {
                ids: duplicates.iter().map(|t| t.id).collect(),
            });
        }

        let new = NewTodo::new(line.body())
            .parent(parent)
            .tags(line.tags().clone())
            .path(self.path.as_str())
            .status(line.status());
        let id = store.insert(&new)?;
        info!(id = %id, parent = ?parent, "created todo");
        Ok(id)
    }
}

/// Active todos whose stored text matches `body`, ignoring the padding
/// left in front of a tag block.
pub(crate) fn active_duplicates<R>(store: &R, body: &str) -> StoreResult<Vec<Todo>>
where
    R: TodoRepository + ?Sized,
{
    Ok(store
        .find_by_body(body)?
        .into_iter()
        .filter(|todo| todo.status.is_active())
        .collect())
}
