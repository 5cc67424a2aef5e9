//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod health;
mod submit;
mod tasks;
mod watch;
mod workers;

use anyhow::Result;
use ccm_core::domain::task::TaskMode;
use ccm_sync::StatusFilter;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Follow the queue live and submit tasks from stdin
    Watch {
        /// Only show tasks with this status (all, queued, running, done, failed)
        #[arg(short, long)]
        status: Option<StatusFilter>,
    },
    /// Submit a new task
    Submit {
        /// What the task should do
        prompt: String,

        /// Project to run the task in (defaults to --project)
        #[arg(long)]
        project: Option<String>,

        /// Execution mode (execute or plan)
        #[arg(short, long, default_value = "execute")]
        mode: TaskMode,
    },
    /// List recent tasks
    Tasks {
        /// Only show tasks with this status
        #[arg(short, long)]
        status: Option<StatusFilter>,
    },
    /// Show one task, including its result
    Task {
        /// Task ID
        id: String,
    },
    /// List workers
    Workers,
    /// Check whether the server is up
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Watch { status } => watch::handle_watch(config, status.unwrap_or_default()).await,
        Commands::Submit {
            prompt,
            project,
            mode,
        } => submit::handle_submit(config, &prompt, project, mode).await,
        Commands::Tasks { status } => tasks::list_tasks(config, status.unwrap_or_default()).await,
        Commands::Task { id } => tasks::show_task(config, &id).await,
        Commands::Workers => workers::list_workers(config).await,
        Commands::Health => health::check_health(config).await,
    }
}
