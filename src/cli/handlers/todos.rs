//! Create, Delete and Load command handlers.

use anyhow::{Context, Result};

use crate::cli::{CreateArgs, DeleteArgs, LoadArgs};
use crate::domain::escape_percent;
use crate::reconcile::{create_from_text, delete_from_text, load_all};
use crate::store::TodoDb;

pub fn handle_create(args: &CreateArgs, db: &TodoDb) -> Result<()> {
    let id = create_from_text(db, &args.text, &args.path)
        .with_context(|| format!("failed to create todo: {}", args.text))?;
    println!("{}", id.code());
    Ok(())
}

pub fn handle_delete(args: &DeleteArgs, db: &TodoDb) -> Result<()> {
    match delete_from_text(db, &args.text).context("failed to delete todo")? {
        Some(id) => println!("Deleted {}", id.code()),
        None => println!("Nothing to delete"),
    }
    Ok(())
}

pub fn handle_load(args: &LoadArgs, db: &TodoDb) -> Result<()> {
    for line in load_lines(db, args.escape)? {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn load_lines(db: &TodoDb, escape: bool) -> Result<Vec<String>> {
    let lines = load_all(db).context("failed to load todos")?;
    Ok(if escape {
        lines.iter().map(|l| escape_percent(l)).collect()
    } else {
        lines
    })
}
