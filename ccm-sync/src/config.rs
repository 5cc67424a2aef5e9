//! Sync engine configuration
//!
//! Defines the tunable parameters of the engine: where the task server lives,
//! how often to poll it, how many tasks to pull, and how long a single request
//! may take.

use std::time::Duration;

const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
const DEFAULT_TASK_LIMIT: usize = 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PROJECT: &str = "deepcell";

/// Sync engine configuration
///
/// All intervals and timeouts are explicit so that slow networks can be
/// tuned for instead of inheriting library defaults.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Task server base URL (e.g., "http://localhost:8080")
    pub server_url: String,

    /// How often to pull task and worker snapshots
    pub poll_interval: Duration,

    /// Maximum number of tasks requested per snapshot
    pub task_limit: usize,

    /// Upper bound for any single request
    pub request_timeout: Duration,

    /// Project preselected in the submission draft
    pub default_project: String,
}

impl SyncConfig {
    /// Creates a new configuration with defaults
    pub fn new(server_url: String) -> Self {
        Self {
            server_url,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            task_limit: DEFAULT_TASK_LIMIT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            default_project: DEFAULT_PROJECT.to_string(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables (all optional):
    /// - CCM_SERVER_URL (default: http://localhost:8080)
    /// - CCM_POLL_INTERVAL_MS (milliseconds, default: 2000)
    /// - CCM_TASK_LIMIT (default: 20)
    /// - CCM_REQUEST_TIMEOUT_SECS (seconds, default: 10)
    /// - CCM_PROJECT (default: deepcell)
    pub fn from_env() -> anyhow::Result<Self> {
        let server_url =
            std::env::var("CCM_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let poll_interval = std::env::var("CCM_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS));

        let task_limit = std::env::var("CCM_TASK_LIMIT")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_TASK_LIMIT);

        let request_timeout = std::env::var("CCM_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        let default_project =
            std::env::var("CCM_PROJECT").unwrap_or_else(|_| DEFAULT_PROJECT.to_string());

        let config = Self {
            server_url,
            poll_interval,
            task_limit,
            request_timeout,
            default_project,
        };
        config.validate()?;

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server_url.is_empty() {
            anyhow::bail!("server_url cannot be empty");
        }

        if !self.server_url.starts_with("http://") && !self.server_url.starts_with("https://") {
            anyhow::bail!("server_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.task_limit == 0 {
            anyhow::bail!("task_limit must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SyncConfig::default();
        assert_eq!(config.server_url, "http://localhost:8080");
        assert_eq!(config.poll_interval, Duration::from_millis(2000));
        assert_eq!(config.task_limit, 20);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.default_project, "deepcell");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        // Invalid URL should fail
        config.server_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());

        config.server_url = "https://tasks.example.com".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
        config.poll_interval = Duration::from_millis(500);

        config.task_limit = 0;
        assert!(config.validate().is_err());
        config.task_limit = 5;

        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
