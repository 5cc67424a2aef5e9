//! Health command handler

use anyhow::{Context, Result};
use colored::*;

use crate::config::Config;

/// Check the server and report its status
pub async fn check_health(config: &Config) -> Result<()> {
    let client = config.client()?;

    let health = client
        .health()
        .await
        .with_context(|| format!("Server at {} is unreachable", client.base_url()))?;

    if health.is_ok() {
        println!("{} {}", "✓".green(), format!("{} is up", client.base_url()).bold());
        Ok(())
    } else {
        println!(
            "{} {} reported status '{}'",
            "✗".red(),
            client.base_url(),
            health.status
        );
        anyhow::bail!("Server is not healthy")
    }
}
