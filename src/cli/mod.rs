//! Command-line interface for tasklist
//!
//! This module defines the CLI structure using clap derive macros.
//! `serve` runs the HTTP server; the task subcommands talk to one.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;

mod init;
mod serve;
mod task;

/// tasklist - a small to-do server and its client
///
/// Run `tasklist serve` to host the task API, then manage tasks with
/// `tasklist create`, `list`, `get`, `update` and `delete`.
#[derive(Parser, Debug)]
#[command(name = "tasklist")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a tasklist.toml (defaults to ./tasklist.toml when present)
    #[arg(long, global = true, env = "TASKLIST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the task server
    #[arg(long, global = true, env = "TODO_BASE_URL")]
    pub base_url: Option<String>,

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
    /// Run the task HTTP server
    Serve {
        /// Address to listen on (e.g. 0.0.0.0:8080)
        #[arg(long, env = "TASKLIST_ADDR")]
        addr: Option<String>,

        /// JSON file holding the tasks
        #[arg(long, env = "TASKLIST_DATA", conflicts_with = "memory")]
        data: Option<PathBuf>,

        /// Keep tasks in memory only (nothing is written to disk)
        #[arg(long)]
        memory: bool,
    },

    /// Write a default tasklist.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// List all tasks
    List,

    /// Create a task
    Create {
        /// Task title
        #[arg(long, required = true)]
        title: String,

        /// Optional category
        #[arg(long)]
        category: Option<String>,

        /// Optional due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },

    /// Show one task
    Get {
        /// Task id
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        id: u64,
    },

    /// Change fields of a task
    Update {
        /// Task id
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        id: u64,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New category
        #[arg(long)]
        category: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Mark as done
        #[arg(long, conflicts_with = "undone")]
        done: bool,

        /// Mark as not done
        #[arg(long)]
        undone: bool,
    },

    /// Delete a task
    Delete {
        /// Task id
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        id: u64,
    },
}

impl Cli {
    /// Whether this invocation runs the server
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }

    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        let Cli {
            config,
            base_url,
            json,
            quiet,
            command,
        } = self;
        let output = OutputOptions { json, quiet };
        let config_path = config.as_deref();

        match command {
            Commands::Init { force } => init::run(config_path, force, output),
            Commands::Serve { addr, data, memory } => {
                let config = Config::resolve(config_path)?;
                serve::run(serve::ServeOptions { addr, data, memory }, &config)
            }
            Commands::List => {
                let client = task::connect(base_url, config_path)?;
                task::run_list(&client, output)
            }
            Commands::Create {
                title,
                category,
                due,
            } => {
                let client = task::connect(base_url, config_path)?;
                task::run_create(
                    &client,
                    task::CreateOptions {
                        title,
                        category,
                        due,
                    },
                    output,
                )
            }
            Commands::Get { id } => {
                let client = task::connect(base_url, config_path)?;
                task::run_get(&client, id, output)
            }
            Commands::Update {
                id,
                title,
                category,
                due,
                done,
                undone,
            } => {
                let client = task::connect(base_url, config_path)?;
                task::run_update(
                    &client,
                    task::UpdateOptions {
                        id,
                        title,
                        category,
                        due,
                        done,
                        undone,
                    },
                    output,
                )
            }
            Commands::Delete { id } => {
                let client = task::connect(base_url, config_path)?;
                task::run_delete(&client, id, output)
            }
        }
    }
}
