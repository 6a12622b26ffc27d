//! Reconcile command handler.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::cli::ReconcileArgs;
use crate::infra::{read_document, scan_markdown_files, write_document};
use crate::reconcile::{BufferWalker, Mode, Reconciler};
use crate::store::{StoreSource, TodoDb};

pub fn handle_reconcile(args: &ReconcileArgs, db: &TodoDb) -> Result<()> {
    let mode = if args.read { Mode::Read } else { Mode::Write };
    let files = collect_files(&args.paths)?;
    let mut rewritten = 0;

    for file in &files {
        let provenance = args
            .path
            .clone()
            .unwrap_or_else(|| file.display().to_string());

        let text = read_document(file)
            .with_context(|| format!("failed to read {}", file.display()))?;
        let output = reconcile_text(db, &text, &provenance, mode)
            .with_context(|| format!("failed to reconcile {}", file.display()))?;

        if args.stdout {
            print!("{output}");
        } else if output != text {
            write_document(file, &output)
                .with_context(|| format!("failed to write {}", file.display()))?;
            info!(file = %file.display(), "rewrote");
            rewritten += 1;
        } else {
            debug!(file = %file.display(), "unchanged");
        }
    }

    if !args.stdout {
        println!("Reconciled {} file(s), {} rewritten", files.len(), rewritten);
    }
    Ok(())
}

/// Expands directories into the Markdown files below them.
pub(crate) fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let found = scan_markdown_files(path)
                .with_context(|| format!("failed to scan {}", path.display()))?;
            files.extend(found);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Runs one document through the walker, keeping a trailing newline.
pub(crate) fn reconcile_text<S: StoreSource>(
    source: S,
    text: &str,
    provenance: &str,
    mode: Mode,
) -> Result<String> {
    let walker = BufferWalker::new(Reconciler::new(source, provenance));
    let lines = walker.walk(text.lines(), mode)?;

    let mut output = lines.join("\n");
    if text.ends_with('\n') && !lines.is_empty() {
        output.push('\n');
    }
    Ok(output)
}
