//! Resolving link targets found in documents.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors while resolving a link target.
///
/// An unsupported shape and a missing file have distinct messages so a
/// typo can be told apart from a file that is not there.
#[derive(Debug, Error, PartialEq)]
pub enum UriError {
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("{0} not set in environment, cannot proceed")]
    UnsetVariable(String),

    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
}

/// Where a link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Url(String),
    Path(PathBuf),
}

impl Target {
    /// The target as the argument handed to an opener.
    pub fn as_arg(&self) -> &str {
        match self {
            Target::Url(url) => url,
            Target::Path(path) => path.to_str().unwrap_or_default(),
        }
    }
}

/// Resolves a link target to a URL or an existing path.
///
/// `http`/`https` links are URLs. Paths may be absolute, start with `~`,
/// start with `$VAR` (looked up through `env`), or be relative to the
/// current directory.
///
/// # Examples
///
/// ```
/// use todomark::infra::uri::{Target, UriError, resolve_target};
///
/// let url = resolve_target("https://example.com", |_| None).unwrap();
/// assert_eq!(url, Target::Url("https://example.com".into()));
///
/// let err = resolve_target("$NOPE/file.md", |_| None).unwrap_err();
/// assert_eq!(err, UriError::UnsetVariable("$NOPE".into()));
/// ```
pub fn resolve_target<E>(arg: &str, env: E) -> Result<Target, UriError>
where
    E: Fn(&str) -> Option<String>,
{
    let arg = arg.trim();

    if arg.starts_with("http://") || arg.starts_with("https://") {
        debug!(arg, "http link");
        return Ok(Target::Url(arg.to_string()));
    }
    if has_foreign_scheme(arg) {
        return Err(UriError::UnknownProtocol(arg.to_string()));
    }

    let path = match arg.chars().next() {
        Some('/') => PathBuf::from(arg),
        Some('~') => expand_home(arg)?,
        Some('$') => expand_variable(arg, &env)?,
        Some(c) if c == '.' || c.is_ascii_alphanumeric() => std::path::absolute(arg)
            .map_err(|_| UriError::NotFound(PathBuf::from(arg)))?,
        _ => return Err(UriError::UnknownProtocol(arg.to_string())),
    };

    if !path.exists() {
        return Err(UriError::NotFound(path));
    }
    Ok(Target::Path(path))
}

/// Splits `file.md#heading` into the file and its jump target.
///
/// Markdown targets keep the leading `#` since they name a heading.
///
/// ```
/// use todomark::infra::uri::split_anchor;
///
/// assert_eq!(split_anchor("notes.md#Todo"), ("notes.md", Some("#Todo".to_string())));
/// assert_eq!(split_anchor("main.rs#fn main"), ("main.rs", Some("fn main".to_string())));
/// assert_eq!(split_anchor("plain.txt"), ("plain.txt", None));
/// ```
pub fn split_anchor(arg: &str) -> (&str, Option<String>) {
    let Some((path, anchor)) = arg.split_once('#') else {
        return (arg, None);
    };
    let is_markdown = Path::new(path).extension().is_some_and(|e| e == "md");
    if is_markdown {
        (path, Some(format!("#{anchor}")))
    } else {
        (path, Some(anchor.to_string()))
    }
}

fn has_foreign_scheme(arg: &str) -> bool {
    arg.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

fn expand_home(arg: &str) -> Result<PathBuf, UriError> {
    let home = dirs::home_dir().ok_or_else(|| UriError::UnsetVariable("HOME".to_string()))?;
    let rest = arg.trim_start_matches('~').trim_start_matches('/');
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

fn expand_variable<E>(arg: &str, env: &E) -> Result<PathBuf, UriError>
where
    E: Fn(&str) -> Option<String>,
{
    let (head, rest) = arg.split_once('/').unwrap_or((arg, ""));
    let name = head.trim_start_matches('$');
    let value = env(name).ok_or_else(|| UriError::UnsetVariable(head.to_string()))?;
    let base = PathBuf::from(value);
    Ok(if rest.is_empty() { base } else { base.join(rest) })
}
