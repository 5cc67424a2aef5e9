//! CC Manager HTTP Client
//!
//! A small, type-safe HTTP client for the CC Manager task server.
//!
//! Every operation issues exactly one request and never retries. Failures of
//! any kind (network, non-2xx status, unparseable body) come back as
//! [`ClientError`], which is distinct from a successful empty answer.
//!
//! # Example
//!
//! ```no_run
//! use ccm_client::ManagerClient;
//! use ccm_core::domain::task::TaskMode;
//! use ccm_core::dto::task::CreateTask;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ManagerClient::new("http://localhost:8080");
//!
//!     client
//!         .submit_task(&CreateTask::from_prompt("deepcell", "fix bug", TaskMode::Execute))
//!         .await?;
//!
//!     let tasks = client.fetch_tasks(20).await?;
//!     println!("{} task(s) on the server", tasks.len());
//!     Ok(())
//! }
//! ```

pub mod error;
mod health;
mod tasks;
mod transport;
mod workers;

// Re-export commonly used types
pub use error::{ClientError, Result};
pub use transport::TaskTransport;

use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client for the task server API
///
/// Endpoints are grouped by resource:
/// - Tasks (submit, list, get)
/// - Workers (list)
/// - Health check
#[derive(Debug, Clone)]
pub struct ManagerClient {
    /// Base URL of the server (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ManagerClient {
    /// Create a new client with reqwest's default settings
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the task server (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use ccm_client::ManagerClient;
    ///
    /// let client = ManagerClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client whose requests give up after `timeout`
    ///
    /// A request that exceeds the timeout fails with
    /// [`ClientError::RequestFailed`] and [`ClientError::is_timeout`] is true.
    ///
    /// # Example
    /// ```
    /// use ccm_client::ManagerClient;
    /// use std::time::Duration;
    ///
    /// let client = ManagerClient::with_timeout("http://localhost:8080", Duration::from_secs(10))?;
    /// # Ok::<(), ccm_client::ClientError>(())
    /// ```
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Create a new client with a custom HTTP client
    ///
    /// This allows you to configure proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Check the status code and deserialize the JSON body
    ///
    /// The body is read in full before parsing so that a dropped connection
    /// surfaces as `RequestFailed` and only malformed JSON as `ParseError`.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.bytes().await?;

        serde_json::from_slice(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Check the status code of a response whose body is ignored
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ManagerClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = ManagerClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_with_timeout() {
        let client =
            ManagerClient::with_timeout("http://localhost:8080//", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
