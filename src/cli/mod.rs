//! Command-line interface for todos
//!
//! This module defines the CLI structure using clap derive macros.
//! Command bodies live in `task`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// todos - a persistent to-do list
///
/// Add, complete, sort and remove tasks. Tasks can carry an image reference.
#[derive(Parser, Debug)]
#[command(name = "todos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task store
    #[arg(long, global = true, env = "TODOS_DIR")]
    pub dir: Option<PathBuf>,

    /// Path to a todos.toml config file
    #[arg(long, global = true, env = "TODOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task
    Add {
        /// Task text (words are joined with spaces)
        #[arg(required = true)]
        text: Vec<String>,

        /// Image reference (URL or data URI) to attach
        #[arg(long)]
        image: Option<String>,
    },

    /// List tasks in their current order
    #[command(alias = "ls")]
    List {
        /// Only show completed tasks
        #[arg(long)]
        completed: bool,
    },

    /// Toggle completion of the task at a position
    Toggle {
        /// 1-based position as shown by `list`
        position: usize,
    },

    /// Remove the task at a position
    #[command(alias = "remove")]
    Rm {
        /// 1-based position as shown by `list`
        position: usize,
    },

    /// Sort tasks by creation time
    Sort {
        /// asc (oldest first) or desc (newest first)
        direction: String,
    },

    /// Pick a random task
    Random,

    /// Erase the entire store
    Clear {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let store = task::StoreOptions {
            dir: self.dir,
            config: self.config,
        };
        let output = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Add { text, image } => task::run_add(task::AddOptions {
                text: text.join(" "),
                image,
                store,
                output,
            }),
            Commands::List { completed } => task::run_list(task::ListOptions {
                completed,
                store,
                output,
            }),
            Commands::Toggle { position } => task::run_toggle(task::PositionOptions {
                position,
                store,
                output,
            }),
            Commands::Rm { position } => task::run_rm(task::PositionOptions {
                position,
                store,
                output,
            }),
            Commands::Sort { direction } => task::run_sort(task::SortOptions {
                direction,
                store,
                output,
            }),
            Commands::Random => task::run_random(task::RandomOptions { store, output }),
            Commands::Clear { yes } => task::run_clear(task::ClearOptions { yes, store, output }),
        }
    }
}
