//! Health check endpoint

use ccm_core::dto::health::HealthStatus;

use crate::ManagerClient;
use crate::error::Result;

impl ManagerClient {
    /// Query the server's health endpoint
    pub async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
