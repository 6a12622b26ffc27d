//! todomark - keep Markdown todo lines in sync with a todo database

pub mod cli;
pub mod domain;
pub mod infra;
pub mod logging;
pub mod reconcile;
pub mod store;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        handle_completions, handle_create, handle_delete, handle_load, handle_mime, handle_open,
        handle_reconcile, handle_search, handle_show, handle_tags, handle_unbookmark,
    },
};
use store::TodoDb;

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let config = Config::load()?;
    let db_path = config.db_path(cli.db.as_ref());

    match &cli.command {
        Command::Reconcile(args) => handle_reconcile(args, &open_db(&db_path)?),
        Command::Create(args) => handle_create(args, &open_db(&db_path)?),
        Command::Delete(args) => handle_delete(args, &open_db(&db_path)?),
        Command::Load(args) => handle_load(args, &open_db(&db_path)?),
        Command::Search(args) => handle_search(args, &open_db(&db_path)?),
        Command::Tags(args) => handle_tags(args, &open_db(&db_path)?),
        Command::Show(args) => handle_show(args, &open_db(&db_path)?),
        Command::Open(args) => handle_open(args, &config, &config.mime_rules()?, &db_path),
        Command::Mime(args) => handle_mime(args, &config.mime_rules()?),
        Command::Unbookmark(args) => handle_unbookmark(args, &config, &db_path),
        Command::Completions(args) => handle_completions(args),
    }
}

/// Opens the todo database, creating it on first use.
fn open_db(path: &Path) -> Result<TodoDb> {
    let db = TodoDb::new(path);
    db.init()
        .with_context(|| format!("failed to initialize todo database at {}", path.display()))?;
    Ok(db)
}
