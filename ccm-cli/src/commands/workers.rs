//! Worker command handlers

use anyhow::{Context, Result};

use crate::config::Config;
use crate::render::print_workers;

/// List all workers in the pool
pub async fn list_workers(config: &Config) -> Result<()> {
    let client = config.client()?;

    let workers = client
        .fetch_workers()
        .await
        .context("Failed to fetch workers")?;

    print_workers(&workers);

    Ok(())
}
