//! CC Manager CLI
//!
//! Command-line front end for a CC Manager task server: watch the queue live,
//! submit tasks, and inspect tasks and workers.

mod commands;
mod config;
mod render;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "ccm")]
#[command(about = "CC Manager task queue CLI", long_about = None)]
struct Cli {
    /// Task server URL [env: CCM_SERVER_URL, default: http://localhost:8080]
    #[arg(long)]
    server_url: Option<String>,

    /// Milliseconds between refreshes in watch mode [env: CCM_POLL_INTERVAL_MS]
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Maximum number of tasks fetched per refresh [env: CCM_TASK_LIMIT]
    #[arg(long)]
    task_limit: Option<usize>,

    /// Seconds before a single request is abandoned [env: CCM_REQUEST_TIMEOUT_SECS]
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Project new tasks are submitted to [env: CCM_PROJECT]
    #[arg(long)]
    project: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so rendered output on stdout stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ccm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        server_url: cli.server_url,
        poll_interval_ms: cli.poll_interval_ms,
        task_limit: cli.task_limit,
        timeout_secs: cli.timeout_secs,
        project: cli.project,
    };

    handle_command(cli.command, &config).await
}
