//! Whole-document walk: fences, running block, survivors in order.

use super::{Decision, Mode, ReconcileResult, Reconciler};
use crate::domain::TodoLine;
use crate::store::StoreSource;
use tracing::{debug, trace};

/// Todo lines emitted since the last block boundary, oldest first.
#[derive(Debug, Clone, Default)]
pub struct RunningBlock {
    lines: Vec<TodoLine>,
}

impl RunningBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: TodoLine) {
        self.lines.push(line);
    }

    /// The most recently emitted line.
    pub fn last(&self) -> Option<&TodoLine> {
        self.lines.last()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// True for a line that opens or closes a fenced code block.
pub fn is_fence(line: &str) -> bool {
    line.trim().starts_with("```")
}

/// Walks a document line by line, reconciling todo lines and passing
/// everything else through.
#[derive(Debug, Clone)]
pub struct BufferWalker<S> {
    reconciler: Reconciler<S>,
}

impl<S: StoreSource> BufferWalker<S> {
    pub fn new(reconciler: Reconciler<S>) -> Self {
        Self { reconciler }
    }

    pub fn reconciler(&self) -> &Reconciler<S> {
        &self.reconciler
    }

    /// Returns the surviving lines in document order.
    ///
    /// Stops at the first fatal error; rows committed for earlier lines
    /// stay committed.
    pub fn walk<I>(&self, lines: I, mode: Mode) -> ReconcileResult<Vec<String>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut out = Vec::new();
        let mut block = RunningBlock::new();
        let mut in_fence = false;

        for raw in lines {
            let raw = raw.as_ref();

            if is_fence(raw) {
                in_fence = !in_fence;
                block.clear();
                out.push(raw.to_string());
                continue;
            }
            if in_fence {
                out.push(raw.to_string());
                continue;
            }

            let Some(line) = TodoLine::parse(raw) else {
                block.clear();
                out.push(raw.to_string());
                continue;
            };

            match self.reconciler.reconcile(line, &block, mode)? {
                Decision::Emit(line) => {
                    let rendered = line.render();
                    trace!(line = %rendered, "emit");
                    out.push(rendered);
                    block.push(line);
                }
                Decision::Drop => debug!(raw, "dropped line"),
            }
        }

        Ok(out)
    }
}
