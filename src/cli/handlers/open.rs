//! Open, Mime and Unbookmark command handlers.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::cli::config::Config;
use crate::cli::{MimeArgs, OpenArgs, UnbookmarkArgs};
use crate::infra::bookmarks::{
    BookmarkStore, SqliteBookmarks, Unbookmark, bookmark_url, delete_bookmark_in_line,
};
use crate::infra::mime::MimeRules;
use crate::infra::opener::{Opener, SystemOpener};
use crate::infra::uri::{Target, resolve_target, split_anchor};

/// Trait for launching an editor (allows mocking in tests).
pub(crate) trait EditorLauncher {
    fn open(&self, path: &Path, anchor: Option<&str>) -> Result<()>;
}

/// Where `open` sent its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Opened {
    Editor(PathBuf),
    System(String),
}

pub fn handle_open(args: &OpenArgs, config: &Config, rules: &MimeRules, db_path: &Path) -> Result<()> {
    struct RealEditor(String);
    impl EditorLauncher for RealEditor {
        fn open(&self, path: &Path, anchor: Option<&str>) -> Result<()> {
            open_in_editor(&self.0, path, anchor)
        }
    }

    let mut bookmarks = if args.bookmark {
        Some(open_bookmarks(&config.bookmarks_path(db_path))?)
    } else {
        None
    };

    let opened = handle_open_impl(
        args,
        rules,
        &RealEditor(config.editor()),
        &SystemOpener::new(),
        bookmarks.as_mut().map(|b| b as &mut dyn BookmarkStore),
        |name| std::env::var(name).ok(),
    )?;
    debug!(?opened, "open");
    Ok(())
}

/// Text files go to the editor, everything else to the system opener.
pub(crate) fn handle_open_impl<E, O, V>(
    args: &OpenArgs,
    rules: &MimeRules,
    editor: &E,
    opener: &O,
    bookmarks: Option<&mut dyn BookmarkStore>,
    env: V,
) -> Result<Opened>
where
    E: EditorLauncher + ?Sized,
    O: Opener + ?Sized,
    V: Fn(&str) -> Option<String>,
{
    let uri = args.uri.trim();
    let (arg, anchor) = if is_web(uri) {
        (uri, None)
    } else {
        split_anchor(uri)
    };

    let target = resolve_target(arg, env)?;
    match &target {
        Target::Url(url) => {
            if let Some(store) = bookmarks {
                bookmark_url(store, url).context("failed to bookmark")?;
            }
            opener.open(url);
            Ok(Opened::System(url.clone()))
        }
        Target::Path(path) if rules.is_text(target.as_arg()) => {
            editor.open(path, anchor.as_deref())?;
            Ok(Opened::Editor(path.clone()))
        }
        Target::Path(_) => {
            opener.open(target.as_arg());
            Ok(Opened::System(target.as_arg().to_string()))
        }
    }
}

pub(crate) fn open_in_editor(editor: &str, path: &Path, anchor: Option<&str>) -> Result<()> {
    // Parse editor command (may include args like "code --wait")
    let parts: Vec<&str> = editor.split_whitespace().collect();
    let Some((cmd, args)) = parts.split_first() else {
        bail!("editor command is empty");
    };

    let status = Command::new(cmd)
        .args(args)
        .args(anchor.map(|a| format!("+/{a}")))
        .arg(path)
        .status()
        .with_context(|| format!("failed to launch editor '{}'", editor))?;

    if !status.success() {
        bail!("editor '{}' exited with non-zero status", editor);
    }

    Ok(())
}

fn is_web(uri: &str) -> bool {
    uri.starts_with("http://") || uri.starts_with("https://")
}

pub fn handle_mime(args: &MimeArgs, rules: &MimeRules) -> Result<()> {
    println!("{}", rules.classify(args.uri.trim()));
    Ok(())
}

pub fn handle_unbookmark(args: &UnbookmarkArgs, config: &Config, db_path: &Path) -> Result<()> {
    let mut store = open_bookmarks(&config.bookmarks_path(db_path))?;
    match delete_bookmark_in_line(&mut store, &args.line)? {
        Unbookmark::Deleted { id, url } => println!("Deleted bookmark {id}: {url}"),
        Unbookmark::NotFound { url } => println!("Not bookmarked: {url}"),
        Unbookmark::NotManaged { id, url } => {
            println!("Kept bookmark {id}: {url} (not added by todomark)")
        }
    }
    Ok(())
}

fn open_bookmarks(path: &Path) -> Result<SqliteBookmarks> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    SqliteBookmarks::open(path)
        .with_context(|| format!("failed to open bookmarks at {}", path.display()))
}
