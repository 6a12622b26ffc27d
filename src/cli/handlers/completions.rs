//! Completions command handler.

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;
use std::io;

use crate::cli::{Cli, CompletionsArgs};

pub fn handle_completions(args: &CompletionsArgs) -> Result<()> {
    generate(args.shell, &mut Cli::command(), "todomark", &mut io::stdout());
    Ok(())
}
