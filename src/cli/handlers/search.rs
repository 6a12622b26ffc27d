//! Search, Tags and Show command handlers.

use anyhow::{Context, Result, bail};

use super::{format_todo, open_store};
use crate::cli::output::{Output, OutputFormat, TodoDetail, TodoListing};
use crate::cli::{SearchArgs, ShowArgs, TagsArgs};
use crate::domain::{Todo, TodoId};
use crate::store::{TodoDb, TodoRepository};

pub fn handle_search(args: &SearchArgs, db: &TodoDb) -> Result<()> {
    let store = open_store(db)?;
    let results = search_todos(&store, &args.query, args.active)?;

    match args.format {
        OutputFormat::Human => {
            if results.is_empty() {
                println!("No matching todos found.");
            } else {
                for todo in &results {
                    println!("{}", format_todo(todo));
                }
                println!();
                println!("{} result(s)", results.len());
            }
        }
        OutputFormat::Json => {
            let listings: Vec<TodoListing> = results.iter().map(TodoListing::from).collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
    }
    Ok(())
}

pub(crate) fn search_todos<R: TodoRepository>(
    store: &R,
    query: &str,
    active_only: bool,
) -> Result<Vec<Todo>> {
    let mut results = store
        .find_by_text(query)
        .with_context(|| format!("search failed for query: {query}"))?;
    if active_only {
        results.retain(|t| t.status.is_active());
    }
    Ok(results)
}

pub fn handle_tags(args: &TagsArgs, db: &TodoDb) -> Result<()> {
    let store = open_store(db)?;
    let tags = match &args.tag {
        Some(tag) => store
            .related_tags(tag)
            .with_context(|| format!("failed to list tags related to {tag}"))?,
        None => store.all_tags().context("failed to list tags")?,
    };

    match args.format {
        OutputFormat::Human => {
            for tag in &tags {
                println!("{tag}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Output::new(tags))?),
    }
    Ok(())
}

pub fn handle_show(args: &ShowArgs, db: &TodoDb) -> Result<()> {
    let store = open_store(db)?;
    let detail = todo_detail(&store, args.id)?;

    match args.format {
        OutputFormat::Human => {
            println!("{} [{}] {}", args.id.code(), detail.todo.status, detail.todo.todo);
            if !detail.todo.tags.is_empty() {
                println!("Tags: {}", detail.todo.tags.join(", "));
            }
            println!("Path: {}", detail.todo.path);
            println!("Depth: {}", detail.depth);
            if !detail.ancestors.is_empty() {
                let chain: Vec<_> = detail.ancestors.iter().map(|id| format!("%{id}%")).collect();
                println!("Ancestors: {}", chain.join(" < "));
            }
            if let Some(status) = &detail.overall_status {
                println!("Children: {status}");
            }
            println!("Created: {}  Updated: {}", detail.created, detail.updated);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&Output::new(detail))?),
    }
    Ok(())
}

pub(crate) fn todo_detail<R: TodoRepository>(store: &R, id: TodoId) -> Result<TodoDetail> {
    let Some(todo) = store.get_by_id(id)? else {
        bail!("todo not found: {}", id.code());
    };

    Ok(TodoDetail {
        todo: TodoListing::from(&todo),
        depth: store.depth_of(id)?,
        ancestors: store
            .ancestors(id)?
            .into_iter()
            .skip(1)
            .map(TodoId::get)
            .collect(),
        overall_status: store.overall_status(id)?.map(|s| s.to_string()),
        created: todo.created_at.format("%Y-%m-%d %H:%M").to_string(),
        updated: todo.last_update_ts.format("%Y-%m-%d %H:%M").to_string(),
    })
}
