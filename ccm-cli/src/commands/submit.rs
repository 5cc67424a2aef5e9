//! Submit command handler

use anyhow::{Context, Result};
use ccm_core::domain::task::TaskMode;
use ccm_sync::{Session, StatusFilter, SubmitOutcome};
use colored::*;

use crate::config::Config;
use crate::render::print_tasks;

/// Submit one task, then show the refreshed queue
pub async fn handle_submit(
    config: &Config,
    prompt: &str,
    project: Option<String>,
    mode: TaskMode,
) -> Result<()> {
    let session = Session::connect(&config.sync_config()?)?;
    let project = project.unwrap_or_else(|| session.config().default_project.clone());

    let outcome = session
        .submissions()
        .submit(&project, prompt, mode)
        .await
        .context("Task was not submitted")?;

    if outcome == SubmitOutcome::Submitted {
        println!(
            "{} {}",
            "✓".green(),
            format!("Submitted to {} ({})", project, mode).bold()
        );
    }

    session
        .synchronizer()
        .refresh_once()
        .await
        .context("Task submitted, but the queue could not be refreshed")?;

    println!();
    print_tasks(
        &session.store().filtered_tasks(StatusFilter::All),
        "Recent tasks",
    );

    Ok(())
}
