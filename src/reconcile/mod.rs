//! Buffer reconciliation: parent resolution, per-line decisions and the
//! document walk.

mod commands;
mod reconciler;
mod resolver;
mod walker;

pub use commands::{create_from_text, delete_from_text, load_all};
pub use reconciler::{Decision, Mode, ReconcileError, ReconcileResult, Reconciler};
pub use resolver::resolve_parent;
pub use walker::{BufferWalker, RunningBlock, is_fence};
