//! Colloquy CLI - Drive a Conversation from the Terminal
//!
//! # Usage
//! - `colloquy` - list the conversations under the default location
//! - `colloquy -n greeting` - load `greeting.cnv` and run it interactively
//! - `colloquy -l path/to/dir -n support` - run from another location
//!
//! Entering `q`, `quit`, or `exit` at any prompt ends the run immediately.

mod drive;

use anyhow::{Context, Result};
use clap::Parser;
use colloquy_core::Session;
use colloquy_storage::{FilesystemStorage, Storage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Terminal driver for Colloquy dialogue graphs.
#[derive(Parser)]
#[command(name = "colloquy", version, about = "Drive a branching conversation")]
struct Cli {
    /// Folder holding conversation files
    #[arg(short, long, default_value = "demos")]
    location: PathBuf,

    /// Conversation to load; omit to list what is available
    #[arg(short, long)]
    name: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let storage = FilesystemStorage;

    let Some(name) = cli.name else {
        for name in storage.list(&cli.location)? {
            println!("{name}");
        }
        return Ok(());
    };

    let graph = storage
        .read(&name, &cli.location)
        .with_context(|| format!("loading conversation `{name}`"))?;

    let mut rng = rand::thread_rng();
    let mut session = Session::start(&graph, &mut rng)
        .with_context(|| format!("starting conversation `{name}`"))?;

    drive::run(&mut session, &mut rng)
}
