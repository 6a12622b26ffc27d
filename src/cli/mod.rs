//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::domain::TodoId;
use output::OutputFormat;

/// todomark - keep Markdown todo lines in sync with a todo database
#[derive(Parser, Debug)]
#[command(name = "todomark", version, about, long_about = None)]
pub struct Cli {
    /// Todo database (overrides $TODOMARK_DB and config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Reconcile the todo lines of Markdown files with the database
    Reconcile(ReconcileArgs),

    /// Create a todo from a line of text
    Create(CreateArgs),

    /// Delete the todo whose code appears in a line of text
    Delete(DeleteArgs),

    /// Print every todo as an indented list
    Load(LoadArgs),

    /// Full-text search across todos
    Search(SearchArgs),

    /// List tags, or the tags used together with one tag
    Tags(TagsArgs),

    /// Show a todo and its place in the hierarchy
    Show(ShowArgs),

    /// Open a URL or file with the system handler
    Open(OpenArgs),

    /// Print the MIME type of a URL or file
    Mime(MimeArgs),

    /// Delete the bookmark for the first URL in a line
    Unbookmark(UnbookmarkArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `reconcile` command
#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Markdown files or directories to reconcile
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Refresh lines from the database instead of writing them to it
    #[arg(long)]
    pub read: bool,

    /// Provenance recorded on new todos (defaults to the file path)
    #[arg(long)]
    pub path: Option<String>,

    /// Print the result instead of rewriting files
    #[arg(long)]
    pub stdout: bool,
}

/// Arguments for the `create` command
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Todo text, either a todo line or a plain body
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Provenance recorded on the todo
    #[arg(long, default_value = "cli")]
    pub path: String,
}

/// Arguments for the `delete` command
#[derive(Parser, Debug)]
pub struct DeleteArgs {
    /// A todo line carrying a code, e.g. `-%13% [ ] call mom`
    #[arg(allow_hyphen_values = true)]
    pub text: String,
}

/// Arguments for the `load` command
#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Double `%` for hosts that expand it
    #[arg(long)]
    pub escape: bool,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search query (FTS5 syntax)
    pub query: String,

    /// Only show active todos
    #[arg(short, long)]
    pub active: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Only list tags used together with this one
    pub tag: Option<String>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Todo id
    pub id: TodoId,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `open` command
#[derive(Parser, Debug)]
pub struct OpenArgs {
    /// URL, path, `~/path` or `$VAR/path`, optionally with `#anchor`
    pub uri: String,

    /// Also bookmark http(s) URLs
    #[arg(short, long)]
    pub bookmark: bool,
}

/// Arguments for the `mime` command
#[derive(Parser, Debug)]
pub struct MimeArgs {
    /// URL or path to classify
    pub uri: String,
}

/// Arguments for the `unbookmark` command
#[derive(Parser, Debug)]
pub struct UnbookmarkArgs {
    /// Line of text containing the URL
    #[arg(allow_hyphen_values = true)]
    pub line: String,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
