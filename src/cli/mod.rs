//! Command-line interface for agenda
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::storage::Storage;
use crate::task::TaskStore;

mod board;
mod init;
mod projects;
mod task;

/// agenda - tasks grouped by due date
///
/// A single-user task manager: create, complete, schedule, and delete tasks,
/// viewed in due-date buckets (Today, Tomorrow, Next 7 days, Upcoming,
/// Unscheduled).
#[derive(Parser, Debug)]
#[command(name = "agenda")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the task store (defaults to the platform data dir)
    #[arg(long, global = true, env = "AGENDA_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(long, global = true, env = "AGENDA_CONFIG")]
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
    /// Create the data directory and a default configuration file
    Init,

    /// Add a new task
    Add {
        /// Task description
        description: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long, value_name = "YYYY-MM-DD")]
        due: Option<String>,

        /// Project id from the configured catalog
        #[arg(long)]
        project: Option<String>,
    },

    /// List tasks grouped by due-date bucket
    List {
        /// Only tasks assigned to this project
        #[arg(long)]
        project: Option<String>,

        /// Only completed tasks
        #[arg(long, conflicts_with = "pending")]
        completed: bool,

        /// Only tasks not yet completed
        #[arg(long)]
        pending: bool,

        /// Reference day for grouping (defaults to the local calendar day)
        #[arg(long, value_name = "YYYY-MM-DD")]
        today: Option<String>,
    },

    /// Show a single task
    Show {
        /// Task id
        id: u64,
    },

    /// Mark a task completed
    Done {
        /// Task id
        id: u64,
    },

    /// Mark a task as not completed
    Reopen {
        /// Task id
        id: u64,
    },

    /// Set or clear a task's due date
    Due {
        /// Task id
        id: u64,

        /// New due date (YYYY-MM-DD)
        #[arg(value_name = "YYYY-MM-DD", required_unless_present = "clear")]
        date: Option<String>,

        /// Remove the due date instead
        #[arg(long, conflicts_with = "date")]
        clear: bool,
    },

    /// Assign a task to a project, or clear the assignment
    Project {
        /// Task id
        id: u64,

        /// Project id from the configured catalog
        #[arg(required_unless_present = "clear")]
        project: Option<String>,

        /// Remove the project assignment instead
        #[arg(long, conflicts_with = "project")]
        clear: bool,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: u64,
    },

    /// List the configured project catalog
    Projects,

    /// Open the interactive board
    Board,
}

/// Shared context resolved from the global flags
pub(crate) struct Context {
    pub data_dir: Option<PathBuf>,
    pub config_path: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl Context {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    pub fn config(&self) -> Result<Config> {
        Config::load(self.config_path.as_deref())
    }

    pub fn store(&self, config: &Config) -> Result<TaskStore> {
        let storage = Storage::resolve(self.data_dir.clone(), config)?;
        Ok(TaskStore::new(storage))
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let Cli {
            data_dir,
            config,
            json,
            quiet,
            command,
        } = self;
        let ctx = Context {
            data_dir,
            config_path: config,
            json,
            quiet,
        };

        match command {
            Commands::Init => init::run(&ctx),
            Commands::Add {
                description,
                due,
                project,
            } => task::add(&ctx, description, due, project),
            Commands::List {
                project,
                completed,
                pending,
                today,
            } => task::list(&ctx, project, completed, pending, today),
            Commands::Show { id } => task::show(&ctx, id),
            Commands::Done { id } => task::set_completed(&ctx, id, true),
            Commands::Reopen { id } => task::set_completed(&ctx, id, false),
            Commands::Due { id, date, clear } => task::set_due(&ctx, id, date, clear),
            Commands::Project { id, project, clear } => {
                task::set_project(&ctx, id, project, clear)
            }
            Commands::Rm { id } => task::remove(&ctx, id),
            Commands::Projects => projects::run(&ctx),
            Commands::Board => board::run(&ctx),
        }
    }
}
