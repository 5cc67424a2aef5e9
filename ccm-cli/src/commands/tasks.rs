//! Task command handlers
//!
//! Listing goes through one refresh cycle of the sync engine; single-task
//! lookups talk to the server directly.

use anyhow::{Context, Result};
use ccm_core::domain::id::RemoteId;
use ccm_sync::{Session, StatusFilter};

use crate::config::Config;
use crate::render::{print_task_details, print_tasks};

/// List the most recent tasks
pub async fn list_tasks(config: &Config, filter: StatusFilter) -> Result<()> {
    let session = Session::connect(&config.sync_config()?)?;

    session
        .synchronizer()
        .refresh_once()
        .await
        .context("Failed to refresh tasks")?;

    let tasks = session.store().filtered_tasks(filter);
    print_tasks(&tasks, &format!("Tasks [{}]", filter));

    Ok(())
}

/// Get and display a single task
pub async fn show_task(config: &Config, id: &str) -> Result<()> {
    let client = config.client()?;
    let id = RemoteId::from(id);

    let task = match client.get_task(&id).await {
        Ok(task) => task,
        Err(e) if e.is_not_found() => anyhow::bail!("Task {} not found", id),
        Err(e) => return Err(e).with_context(|| format!("Failed to fetch task {}", id)),
    };

    print_task_details(&task);

    Ok(())
}
