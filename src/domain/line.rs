//! Todo line grammar: parsing a buffer line and rendering it back.
//!
//! A todo line looks like
//!
//! ```text
//! <tabs><bullet>[%id%][filler][<glyph>] <body>[{t:tag1,tag2}]
//! ```
//!
//! Leading tabs give the depth. The identity code is optional; lines
//! without one have not been stored yet.

use crate::domain::{TagSet, Todo, TodoId, TodoStatus};
use regex::Regex;
use std::sync::LazyLock;

static TODO_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\t*)(\s*[-*]\s?)(%\d+%)?(.?)(\[[ \-xXdD]\])( )([^{}]+?)(\{t:.+\})?$")
        .expect("todo line pattern is valid")
});

/// One buffer line decomposed by the todo grammar.
///
/// Fragments the grammar captures but does not interpret (bullet marker,
/// filler, tag block text) are kept verbatim so an untouched line renders
/// back byte for byte.
///
/// # Examples
///
/// ```
/// use todomark::domain::{TodoLine, TodoStatus};
///
/// let line = TodoLine::parse("\t- [x] write tests {t:dev}").unwrap();
/// assert_eq!(line.depth(), 1);
/// assert_eq!(line.status(), TodoStatus::Done);
/// assert_eq!(line.body(), "write tests ");
/// assert_eq!(line.render(), "\t- [x] write tests {t:dev}");
///
/// assert!(TodoLine::parse("- [b] not a todo").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TodoLine {
    depth: usize,
    marker: String,
    code: Option<TodoId>,
    had_code: bool,
    filler: String,
    glyph: char,
    status: TodoStatus,
    body: String,
    tag_block: String,
    tags: TagSet,
    raw: String,
}

impl TodoLine {
    /// Matches a line against the todo grammar.
    ///
    /// Returns `None` for any line that is not a todo line; this is the
    /// normal case for prose and is not an error.
    pub fn parse(line: &str) -> Option<Self> {
        let caps = TODO_LINE.captures(line)?;

        let code = match caps.get(3) {
            Some(m) => Some(m.as_str().parse::<TodoId>().ok()?),
            None => None,
        };

        let glyph = caps[5].chars().nth(1)?;
        let status = TodoStatus::from_glyph(glyph)?;
        let tag_block = caps.get(8).map_or("", |m| m.as_str()).to_string();
        let tags = TagSet::parse_block(&tag_block).unwrap_or_default();

        Some(Self {
            depth: caps[1].len(),
            marker: caps[2].to_string(),
            code,
            had_code: code.is_some(),
            filler: caps[4].to_string(),
            glyph,
            status,
            body: caps[7].to_string(),
            tag_block,
            tags,
            raw: line.to_string(),
        })
    }

    /// Builds the scratch-view line for a stored todo.
    pub fn from_todo(todo: &Todo, depth: usize) -> Self {
        let tag_block = todo.tags.to_block();
        let line = Self {
            depth,
            marker: "-".to_string(),
            code: Some(todo.id),
            had_code: true,
            filler: " ".to_string(),
            glyph: todo.status.glyph(),
            status: todo.status,
            body: todo.todo.clone(),
            tag_block,
            tags: todo.tags.clone(),
            raw: String::new(),
        };
        Self {
            raw: line.render(),
            ..line
        }
    }

    /// Number of leading tabs.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Identity code, if the line has been stored.
    pub fn code(&self) -> Option<TodoId> {
        self.code
    }

    pub fn status(&self) -> TodoStatus {
        self.status
    }

    /// Status glyph as it will be rendered.
    pub fn glyph(&self) -> char {
        self.glyph
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    /// The line text this value was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Embeds a store-assigned identity code.
    pub fn set_code(&mut self, id: TodoId) {
        self.code = Some(id);
    }

    /// Sets the status, keeping the original glyph spelling when it still
    /// decodes to the same status (`X` stays `X`).
    pub fn set_status(&mut self, status: TodoStatus) {
        if TodoStatus::from_glyph(self.glyph) != Some(status) {
            self.glyph = status.glyph();
        }
        self.status = status;
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
    }

    /// Replaces the tag set; the tag block is rewritten only if the set
    /// actually changed.
    pub fn set_tags(&mut self, tags: TagSet) {
        if tags != self.tags {
            self.tag_block = tags.to_block();
            self.tags = tags;
        }
    }

    /// Renders the canonical text of the line.
    pub fn render(&self) -> String {
        let mut out = "\t".repeat(self.depth);

        match self.code {
            Some(id) if !self.had_code => {
                out.push_str(self.marker.trim_end());
                out.push_str(&id.code());
                if !self.filler.starts_with(' ') {
                    out.push(' ');
                }
                out.push_str(&self.filler);
            }
            Some(id) => {
                out.push_str(&self.marker);
                out.push_str(&id.code());
                out.push_str(&self.filler);
            }
            None => {
                out.push_str(&self.marker);
                out.push_str(&self.filler);
            }
        }

        out.push('[');
        out.push(self.glyph);
        out.push_str("] ");
        out.push_str(&self.body);
        out.push_str(&self.tag_block);
        out
    }
}

/// Doubles percent signs for hosts that expand `%` in command text.
///
/// ```
/// use todomark::domain::escape_percent;
///
/// assert_eq!(escape_percent("-%13% [ ] todo yyy"), "-%%13%% [ ] todo yyy");
/// ```
pub fn escape_percent(line: &str) -> String {
    line.replace('%', "%%")
}
