//! Single-line commands that work without a surrounding buffer.

use super::reconciler::active_duplicates;
use super::{ReconcileError, ReconcileResult};
use crate::domain::{NewTodo, TagSet, Todo, TodoId, TodoLine, TodoStatus};
use crate::store::{StoreSource, TodoRepository};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

/// Records a todo given as text, e.g. `- [-] write report {t:work}`.
///
/// Text that does not match the todo grammar is taken as the body of an
/// open todo, unless it holds `{`, `}` or a line break. An existing active todo with the same text is updated
/// instead of duplicated; two or more are a DB inconsistency.
pub fn create_from_text<S: StoreSource>(
    source: &S,
    text: &str,
    path: &str,
) -> ReconcileResult<TodoId> {
    let (body, status, tags) = match TodoLine::parse(text) {
        Some(line) => (line.body().to_string(), line.status(), line.tags().clone()),
        None => (plain_body(text)?, TodoStatus::Open, TagSet::new()),
    };

    let mut store = source.connect()?;
    let mut active = active_duplicates(&store, &body)?;

    match active.len() {
        0 => {
            let new = NewTodo::new(body).status(status).tags(tags).path(path);
            let id = store.insert(&new)?;
            info!(id = %id, "created todo");
            Ok(id)
        }
        1 => {
            let mut todo = active.remove(0);
            todo.status = status;
            todo.tags = tags;
            todo.path = path.to_string();
            let id = store.update(&todo)?;
            info!(id = %id, "updated existing todo");
            Ok(id)
        }
        _ => Err(ReconcileError::DuplicateActive {
            ids: active.iter().map(|t| t.id).collect(),
        }),
    }
}

fn plain_body(text: &str) -> ReconcileResult<String> {
    let body = text.trim();
    if body.contains(['{', '}', '\n', '\r']) {
        return Err(ReconcileError::InvalidBody(body.to_string()));
    }
    Ok(body.to_string())
}

/// Deletes the todo whose code appears in `text`.
///
/// Returns the removed id, or `None` when the text is not a coded todo
/// line or the row is already gone.
pub fn delete_from_text<S: StoreSource>(source: &S, text: &str) -> ReconcileResult<Option<TodoId>> {
    let Some(id) = TodoLine::parse(text).and_then(|line| line.code()) else {
        debug!(text, "no todo code to delete");
        return Ok(None);
    };

    let mut store = source.connect()?;
    let removed = store.delete(id)?.map(|todo| todo.id);
    if removed.is_some() {
        info!(id = %id, "deleted todo");
    }
    Ok(removed)
}

/// Every stored todo as a scratch-view line, children below their parent
/// and indented by their depth.
pub fn load_all<S: StoreSource>(source: &S) -> ReconcileResult<Vec<String>> {
    let store = source.connect()?;
    let todos = store.list_all()?;

    let mut children: BTreeMap<Option<TodoId>, Vec<&Todo>> = BTreeMap::new();
    for todo in &todos {
        children.entry(todo.parent_id).or_default().push(todo);
    }

    let mut lines = Vec::with_capacity(todos.len());
    let mut seen = HashSet::new();
    let mut stack: Vec<(&Todo, usize)> = children
        .get(&None)
        .map(|roots| roots.iter().rev().map(|t| (*t, 0)).collect())
        .unwrap_or_default();

    while let Some((todo, depth)) = stack.pop() {
        if !seen.insert(todo.id) {
            continue;
        }
        lines.push(TodoLine::from_todo(todo, depth).render());
        if let Some(kids) = children.get(&Some(todo.id)) {
            stack.extend(kids.iter().rev().map(|t| (*t, depth + 1)));
        }
    }

    // Rows not reachable from a root (corrupted ancestry) still show up
    for todo in &todos {
        if !seen.contains(&todo.id) {
            lines.push(TodoLine::from_todo(todo, store.depth_of(todo.id)?).render());
        }
    }

    Ok(lines)
}
