//! Parent resolution from indentation and the running block.

use super::RunningBlock;
use crate::domain::{TodoId, TodoLine};
use crate::store::{StoreResult, TodoRepository};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Computes the parent of `line` given the lines already processed in the
/// current block.
///
/// - empty block or depth 0: root
/// - deeper than the previous line: child of the previous line
/// - same depth: sibling, so the previous line's stored parent
/// - shallower: the stored ancestor of the previous line at the effective
///   depth is located and its parent inherited
///
/// Store errors, including `AmbiguousAncestry`, propagate unchanged.
pub fn resolve_parent<R>(
    store: &R,
    line: &TodoLine,
    block: &RunningBlock,
) -> StoreResult<Option<TodoId>>
where
    R: TodoRepository + ?Sized,
{
    if line.depth() == 0 {
        return Ok(None);
    }
    let Some(prev) = block.last() else {
        return Ok(None);
    };
    let Some(prev_id) = prev.code() else {
        debug!(body = prev.body(), "previous line has no code, resolving to root");
        return Ok(None);
    };

    let candidate = match line.depth().cmp(&prev.depth()) {
        Ordering::Greater => Some(prev_id),
        Ordering::Equal => store.get_by_id(prev_id)?.and_then(|todo| todo.parent_id),
        Ordering::Less => {
            let stored = store.depth_of(prev_id)? as i64;
            let offset = line.depth() as i64 - prev.depth() as i64;
            let effective = stored + offset;
            debug!(prev = %prev_id, stored, offset, effective, "dedent");
            if effective < 0 {
                None
            } else {
                store.parent_at_depth(prev_id, effective as usize)?.parent_id
            }
        }
    };

    match (candidate, line.code()) {
        (Some(parent), Some(own)) if store.ancestors(parent)?.contains(&own) => {
            warn!(id = %own, parent = %parent, "parent would create a cycle, resolving to root");
            Ok(None)
        }
        _ => Ok(candidate),
    }
}
