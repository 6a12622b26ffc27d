//! Short labels attached to todos, and their ordered set.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A short label attached to a todo.
///
/// # Validation Rules
/// - Non-empty after trimming
/// - Must not contain commas, braces or whitespace (they delimit the
///   store form and the buffer tag block)
///
/// # Examples
///
/// ```
/// use todomark::domain::Tag;
///
/// let tag = Tag::new(" py ").unwrap();
/// assert_eq!(tag.as_str(), "py");
/// assert!(Tag::new("a,b").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

/// Error returned when parsing an invalid tag.
#[derive(Debug, Clone)]
pub struct ParseTagError(String);

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseTagError {}

impl Tag {
    /// Creates a new Tag from a string.
    ///
    /// # Errors
    ///
    /// Returns `ParseTagError` if the tag is empty or contains a delimiter.
    pub fn new(s: &str) -> Result<Self, ParseTagError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ParseTagError("tag cannot be empty".to_string()));
        }

        if trimmed
            .chars()
            .any(|c| c == ',' || c == '{' || c == '}' || c.is_whitespace())
        {
            return Err(ParseTagError(format!(
                "invalid tag '{}': tags must not contain commas, braces or whitespace",
                trimmed
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Returns the tag value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self.0)
    }
}

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Ordered set of tags; insertion order is kept and duplicates dropped.
///
/// The store form brackets the comma-joined tags with commas (`,a,b,`) so a
/// `LIKE '%,a,%'` match never hits a tag that merely contains `a`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a tag unless it is already present.
    pub fn insert(&mut self, tag: Tag) {
        if !self.0.contains(&tag) {
            self.0.push(tag);
        }
    }

    /// Returns true if the tag is in the set.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    /// Parses a comma-separated list, skipping blank and invalid entries.
    ///
    /// Accepts both `a,b` and the bracketed store form `,a,b,`.
    pub fn parse_list(s: &str) -> Self {
        let mut set = Self::new();
        for part in s.split(',') {
            if let Ok(tag) = Tag::new(part) {
                set.insert(tag);
            }
        }
        set
    }

    /// Parses a buffer tag block such as `{t:todo,py}`.
    ///
    /// Returns `None` when the text is not a tag block.
    pub fn parse_block(block: &str) -> Option<Self> {
        let inner = block.trim().strip_prefix("{t:")?.strip_suffix('}')?;
        Some(Self::parse_list(inner))
    }

    /// Returns the canonical store form, `,a,b,` (or `,,` when empty).
    pub fn to_store_string(&self) -> String {
        let joined: Vec<&str> = self.0.iter().map(Tag::as_str).collect();
        format!(",{},", joined.join(","))
    }

    /// Returns the buffer tag block, or an empty string for an empty set.
    pub fn to_block(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        let joined: Vec<&str> = self.0.iter().map(Tag::as_str).collect();
        format!("{{t:{}}}", joined.join(","))
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = Self::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}
