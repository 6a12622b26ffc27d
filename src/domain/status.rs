//! Todo status with glyph and flag encodings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a todo.
///
/// Variants are ordered by progress, so `status < TodoStatus::Done` means the
/// todo is still active.
///
/// # Encodings
///
/// | Variant    | Glyph      | Flag |
/// |------------|------------|------|
/// | `Open`     | `[ ]`      | 1    |
/// | `Progress` | `[-]`      | 2    |
/// | `Done`     | `[x]` `[X]`| 4    |
/// | `ToDelete` | `[d]` `[D]`| 8    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Open,
    Progress,
    Done,
    ToDelete,
}

/// Error returned when a stored flag value has no status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFlagError(pub i64);

impl fmt::Display for UnknownFlagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown status flag: {}", self.0)
    }
}

impl std::error::Error for UnknownFlagError {}

impl TodoStatus {
    /// Decodes the character between the status brackets.
    ///
    /// Returns `None` for any glyph outside the recognized set.
    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' => Some(Self::Open),
            '-' => Some(Self::Progress),
            'x' | 'X' => Some(Self::Done),
            'd' | 'D' => Some(Self::ToDelete),
            _ => None,
        }
    }

    /// Returns the canonical glyph for this status.
    pub fn glyph(self) -> char {
        match self {
            Self::Open => ' ',
            Self::Progress => '-',
            Self::Done => 'x',
            Self::ToDelete => 'd',
        }
    }

    /// Returns the persisted flag value.
    pub fn flags(self) -> i64 {
        match self {
            Self::Open => 1,
            Self::Progress => 2,
            Self::Done => 4,
            Self::ToDelete => 8,
        }
    }

    /// Decodes a persisted flag value.
    ///
    /// `0` is accepted as `Open` for rows written before flags were
    /// normalized.
    pub fn from_flags(flags: i64) -> Result<Self, UnknownFlagError> {
        match flags {
            0 | 1 => Ok(Self::Open),
            2 => Ok(Self::Progress),
            4 => Ok(Self::Done),
            8 => Ok(Self::ToDelete),
            other => Err(UnknownFlagError(other)),
        }
    }

    /// Returns true while the todo has not reached `Done`.
    pub fn is_active(self) -> bool {
        self < Self::Done
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Progress => "progress",
            Self::Done => "done",
            Self::ToDelete => "todelete",
        };
        f.write_str(name)
    }
}
