//! Worker-related API endpoints

use ccm_core::domain::worker::Worker;

use crate::ManagerClient;
use crate::error::Result;

impl ManagerClient {
    /// List the worker pool
    ///
    /// # Returns
    /// The workers in the order the server returned them
    pub async fn fetch_workers(&self) -> Result<Vec<Worker>> {
        let url = format!("{}/api/workers", self.base_url);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
