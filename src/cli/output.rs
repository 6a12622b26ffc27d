//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Todo;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single todo in listing output.
#[derive(Debug, Serialize)]
pub struct TodoListing {
    pub id: i64,
    pub todo: String,
    pub status: String,
    pub tags: Vec<String>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl From<&Todo> for TodoListing {
    fn from(todo: &Todo) -> Self {
        Self {
            id: todo.id.get(),
            todo: todo.todo.clone(),
            status: todo.status.to_string(),
            tags: todo.tags.iter().map(|t| t.as_str().to_string()).collect(),
            path: todo.path.clone(),
            parent_id: todo.parent_id.map(|p| p.get()),
        }
    }
}

/// A todo with its place in the hierarchy.
#[derive(Debug, Serialize)]
pub struct TodoDetail {
    #[serde(flatten)]
    pub todo: TodoListing,
    pub depth: usize,
    pub ancestors: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_status: Option<String>,
    pub created: String,
    pub updated: String,
}
