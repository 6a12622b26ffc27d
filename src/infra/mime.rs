//! MIME classification from a rule table loaded once at startup.
//!
//! Rule file format, one rule per line, first match wins:
//!
//! ```text
//! # comment
//! ext md,markdown = text/markdown
//! scheme mailto = message/rfc822
//! match ^/proc/ = text/plain
//! ```

use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// MIME type reported when no rule matches.
pub const FALLBACK_MIME: &str = "application/octet-stream";

const BUILTIN_RULES: &str = "\
ext md,markdown = text/markdown
ext txt,text,log = text/plain
ext rs = text/x-rust
ext py = text/x-python
ext sh,bash,zsh = text/x-shellscript
ext toml = text/x-toml
ext yaml,yml = text/x-yaml
ext csv = text/csv
ext html,htm = text/html
ext css = text/css
ext json = application/json
ext pdf = application/pdf
ext zip = application/zip
ext png = image/png
ext jpg,jpeg = image/jpeg
ext gif = image/gif
ext svg = image/svg+xml
ext mp3 = audio/mpeg
ext mp4 = video/mp4
scheme http,https = text/html
scheme mailto = message/rfc822
";

/// Errors while loading a rule table.
#[derive(Debug, Error)]
pub enum MimeError {
    #[error("cannot read MIME rules at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("MIME rules line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("MIME rules line {line}: invalid pattern: {source}")]
    Pattern {
        line: usize,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
enum Matcher {
    Extension(Vec<String>),
    Scheme(Vec<String>),
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, uri: &str) -> bool {
        match self {
            Matcher::Extension(exts) => extension_of(uri).is_some_and(|ext| exts.contains(&ext)),
            Matcher::Scheme(schemes) => uri
                .split_once(':')
                .is_some_and(|(scheme, _)| schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme))),
            Matcher::Pattern(re) => re.is_match(uri),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    matcher: Matcher,
    mime: String,
}

/// An immutable MIME rule table.
///
/// # Examples
///
/// ```
/// use todomark::infra::mime::MimeRules;
///
/// let rules = MimeRules::builtin();
/// assert_eq!(rules.classify("notes/todo.md"), "text/markdown");
/// assert!(rules.is_text("https://example.com"));
/// assert!(!rules.is_text("scan.pdf"));
/// ```
#[derive(Debug, Clone)]
pub struct MimeRules {
    rules: Vec<Rule>,
}

impl MimeRules {
    /// The table compiled into the binary.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_RULES).expect("built-in MIME rules are valid")
    }

    /// Loads a rule file.
    pub fn load(path: &Path) -> Result<Self, MimeError> {
        let text = std::fs::read_to_string(path).map_err(|e| MimeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&text)
    }

    /// Parses rule text; line numbers in errors are 1-based.
    pub fn parse(text: &str) -> Result<Self, MimeError> {
        let mut rules = Vec::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (condition, mime) = trimmed.rsplit_once('=').ok_or_else(|| MimeError::Syntax {
                line,
                message: "expected '<kind> <value> = <mime>'".to_string(),
            })?;
            let (kind, value) = condition
                .trim()
                .split_once(char::is_whitespace)
                .ok_or_else(|| MimeError::Syntax {
                    line,
                    message: "missing rule value".to_string(),
                })?;
            let mime = mime.trim();
            if mime.is_empty() {
                return Err(MimeError::Syntax {
                    line,
                    message: "missing MIME type".to_string(),
                });
            }

            let matcher = match kind {
                "ext" => Matcher::Extension(split_values(value, true)),
                "scheme" => Matcher::Scheme(split_values(value, false)),
                "match" => Matcher::Pattern(
                    Regex::new(value.trim()).map_err(|e| MimeError::Pattern { line, source: e })?,
                ),
                other => {
                    return Err(MimeError::Syntax {
                        line,
                        message: format!("unknown rule kind '{other}'"),
                    });
                }
            };

            rules.push(Rule {
                matcher,
                mime: mime.to_string(),
            });
        }

        Ok(Self { rules })
    }

    /// MIME type of `uri`, or [`FALLBACK_MIME`].
    pub fn classify(&self, uri: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(uri))
            .map_or(FALLBACK_MIME, |rule| rule.mime.as_str())
    }

    /// Whether `uri` should be handled as text.
    pub fn is_text(&self, uri: &str) -> bool {
        self.classify(uri).starts_with("text")
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for MimeRules {
    fn default() -> Self {
        Self::builtin()
    }
}

fn split_values(value: &str, lowercase: bool) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            let v = v.trim_start_matches('.');
            if lowercase { v.to_lowercase() } else { v.to_string() }
        })
        .collect()
}

/// Lowercased extension of the path part of a URI, ignoring query and
/// fragment.
fn extension_of(uri: &str) -> Option<String> {
    let path = uri.split(['?', '#']).next().unwrap_or(uri);
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}
