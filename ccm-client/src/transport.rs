//! Transport abstraction
//!
//! The sync engine only needs three operations from the server. They sit
//! behind a trait so the engine can be driven by scripted transports in tests.

use async_trait::async_trait;
use ccm_core::domain::task::Task;
use ccm_core::domain::worker::Worker;
use ccm_core::dto::task::CreateTask;

use crate::ManagerClient;
use crate::error::Result;

/// Outbound operations used by the sync engine
///
/// Each call performs exactly one request and never retries. `Err` means
/// the answer is unavailable, which callers must keep distinct from an
/// empty `Ok`.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    /// Submits a new task
    async fn submit_task(&self, req: &CreateTask) -> Result<()>;

    /// Fetches up to `limit` of the most recent tasks
    async fn fetch_tasks(&self, limit: usize) -> Result<Vec<Task>>;

    /// Fetches the worker pool
    async fn fetch_workers(&self) -> Result<Vec<Worker>>;
}

#[async_trait]
impl TaskTransport for ManagerClient {
    async fn submit_task(&self, req: &CreateTask) -> Result<()> {
        ManagerClient::submit_task(self, req).await
    }

    async fn fetch_tasks(&self, limit: usize) -> Result<Vec<Task>> {
        ManagerClient::fetch_tasks(self, limit).await
    }

    async fn fetch_workers(&self) -> Result<Vec<Worker>> {
        ManagerClient::fetch_workers(self).await
    }
}
