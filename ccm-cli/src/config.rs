//! Configuration module
//!
//! Environment variables give the base configuration; flags given on the
//! command line override them.

use anyhow::{Context, Result};
use ccm_client::ManagerClient;
use ccm_sync::SyncConfig;
use std::time::Duration;

/// CLI configuration, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// URL of the task server
    pub server_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub task_limit: Option<usize>,
    pub timeout_secs: Option<u64>,
    /// Default project for submissions
    pub project: Option<String>,
}

impl Config {
    /// Builds a validated sync engine configuration
    pub fn sync_config(&self) -> Result<SyncConfig> {
        let base = SyncConfig::from_env().context("Invalid CCM_* environment")?;
        self.apply(base)
    }

    /// Builds an HTTP client honouring the configured timeout
    pub fn client(&self) -> Result<ManagerClient> {
        let sync = self.sync_config()?;
        ManagerClient::with_timeout(sync.server_url, sync.request_timeout)
            .context("Failed to build HTTP client")
    }

    fn apply(&self, mut sync: SyncConfig) -> Result<SyncConfig> {
        if let Some(url) = &self.server_url {
            sync.server_url = url.trim_end_matches('/').to_string();
        }
        if let Some(ms) = self.poll_interval_ms {
            sync.poll_interval = Duration::from_millis(ms);
        }
        if let Some(limit) = self.task_limit {
            sync.task_limit = limit;
        }
        if let Some(secs) = self.timeout_secs {
            sync.request_timeout = Duration::from_secs(secs);
        }
        if let Some(project) = &self.project {
            sync.default_project = project.clone();
        }

        sync.validate().context("Invalid configuration")?;
        Ok(sync)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(server_url: &str) -> Config {
        Config {
            server_url: Some(server_url.to_string()),
            poll_interval_ms: Some(500),
            task_limit: Some(5),
            timeout_secs: Some(3),
            project: Some("other".to_string()),
        }
    }

    #[test]
    fn test_flags_override_base() {
        let sync = flags("http://tasks.local:9000/")
            .apply(SyncConfig::default())
            .unwrap();
        assert_eq!(sync.server_url, "http://tasks.local:9000");
        assert_eq!(sync.poll_interval, Duration::from_millis(500));
        assert_eq!(sync.task_limit, 5);
        assert_eq!(sync.request_timeout, Duration::from_secs(3));
        assert_eq!(sync.default_project, "other");
    }

    #[test]
    fn test_missing_flags_keep_base() {
        let mut base = SyncConfig::default();
        base.task_limit = 7;

        let sync = Config::default().apply(base).unwrap();
        assert_eq!(sync.task_limit, 7);
        assert_eq!(sync.server_url, "http://localhost:8080");
    }

    #[test]
    fn test_invalid_flags_are_rejected() {
        assert!(flags("tasks.local").apply(SyncConfig::default()).is_err());

        let mut bad = flags("http://tasks.local");
        bad.poll_interval_ms = Some(0);
        assert!(bad.apply(SyncConfig::default()).is_err());
    }
}
