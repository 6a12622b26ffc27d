//! Store-assigned integer identifier embedded in buffer lines as `%123%`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a persisted todo.
///
/// The store assigns ids; a buffer line carries its id as the identity code
/// `%<id>%` so later reconciliations can find the row again.
///
/// # Examples
///
/// ```
/// use todomark::domain::TodoId;
///
/// let id: TodoId = "13".parse().unwrap();
/// assert_eq!(id.get(), 13);
/// assert_eq!(id.code(), "%13%");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wraps a raw row id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw row id.
    pub fn get(self) -> i64 {
        self.0
    }

    /// Returns the identity code as written into a buffer line.
    pub fn code(self) -> String {
        format!("%{}%", self.0)
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TodoId({})", self.0)
    }
}

/// Error returned when parsing an invalid todo id.
#[derive(Debug, Clone)]
pub struct ParseTodoIdError(String);

impl fmt::Display for ParseTodoIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid todo id '{}'", self.0)
    }
}

impl std::error::Error for ParseTodoIdError {}

impl FromStr for TodoId {
    type Err = ParseTodoIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_matches('%');
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseTodoIdError(s.to_string()));
        }
        trimmed
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ParseTodoIdError(s.to_string()))
    }
}

impl From<TodoId> for i64 {
    fn from(id: TodoId) -> Self {
        id.0
    }
}
