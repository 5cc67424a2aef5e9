//! Task-related API endpoints

use ccm_core::domain::id::RemoteId;
use ccm_core::domain::task::Task;
use ccm_core::dto::task::CreateTask;
use tracing::debug;

use crate::ManagerClient;
use crate::error::Result;

impl ManagerClient {
    // =============================================================================
    // Task Submission
    // =============================================================================

    /// Submit a new task to the queue
    ///
    /// Sends exactly one `POST /api/tasks`. Any 2xx status counts as success
    /// and the response body is ignored.
    ///
    /// # Arguments
    /// * `req` - The task creation request
    pub async fn submit_task(&self, req: &CreateTask) -> Result<()> {
        let url = format!("{}/api/tasks", self.base_url);
        debug!("Submitting task '{}' to project {}", req.title, req.project);

        let response = self.client.post(&url).json(req).send().await?;

        self.handle_empty_response(response).await
    }

    // =============================================================================
    // Task Query
    // =============================================================================

    /// Fetch the most recent tasks
    ///
    /// # Arguments
    /// * `limit` - Maximum number of tasks the server should return
    ///
    /// # Returns
    /// The tasks in the order the server returned them
    pub async fn fetch_tasks(&self, limit: usize) -> Result<Vec<Task>> {
        let url = format!("{}/api/tasks", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Get a single task, including its prompt and result text
    ///
    /// # Arguments
    /// * `task_id` - The task identifier
    pub async fn get_task(&self, task_id: &RemoteId) -> Result<Task> {
        let url = format!("{}/api/tasks/{}", self.base_url, task_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
