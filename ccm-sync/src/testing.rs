//! Test fixtures shared across modules

use async_trait::async_trait;
use ccm_client::{ClientError, TaskTransport};
use ccm_core::domain::id::RemoteId;
use ccm_core::domain::task::{Task, TaskMode, TaskStatus};
use ccm_core::domain::worker::{Worker, WorkerStatus};
use ccm_core::dto::task::CreateTask;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Notify;

pub fn task(id: u64, status: TaskStatus) -> Task {
    Task {
        id: RemoteId::Number(id),
        title: format!("task {}", id),
        project: "deepcell".to_string(),
        prompt: format!("prompt for task {}", id),
        mode: TaskMode::Execute,
        status,
        created_at: Utc::now(),
        worker_id: None,
        finished_at: None,
        result: None,
    }
}

pub fn worker(id: u64, status: &str) -> Worker {
    Worker {
        id: RemoteId::Number(id),
        status: WorkerStatus::from(status.to_string()),
        current_task_id: None,
        project: None,
    }
}

pub fn unavailable() -> ClientError {
    ClientError::api_error(503, "service unavailable")
}

/// Transport whose answers are queued up front
///
/// An exhausted queue answers with an error, so tests never get an empty
/// collection they did not ask for.
#[derive(Default)]
pub struct ScriptedTransport {
    tasks: Mutex<VecDeque<Result<Vec<Task>, ClientError>>>,
    workers: Mutex<VecDeque<Result<Vec<Worker>, ClientError>>>,
    submits: Mutex<VecDeque<Result<(), ClientError>>>,
    submitted: Mutex<Vec<CreateTask>>,
    submit_gate: Option<Notify>,
    fetch_delay: Option<Duration>,
    pub fetch_task_calls: AtomicUsize,
    pub fetch_worker_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holds every submission until [`Self::release_submit`] is called
    pub fn gated() -> Self {
        Self {
            submit_gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    /// Makes every fetch take `delay` (tokio time)
    pub fn slow(delay: Duration) -> Self {
        Self {
            fetch_delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn push_tasks(&self, answer: Result<Vec<Task>, ClientError>) {
        self.tasks.lock().unwrap().push_back(answer);
    }

    pub fn push_workers(&self, answer: Result<Vec<Worker>, ClientError>) {
        self.workers.lock().unwrap().push_back(answer);
    }

    pub fn push_submit(&self, answer: Result<(), ClientError>) {
        self.submits.lock().unwrap().push_back(answer);
    }

    pub fn release_submit(&self) {
        if let Some(gate) = &self.submit_gate {
            gate.notify_one();
        }
    }

    pub fn submitted(&self) -> Vec<CreateTask> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskTransport for ScriptedTransport {
    async fn submit_task(&self, req: &CreateTask) -> Result<(), ClientError> {
        self.submitted.lock().unwrap().push(req.clone());
        if let Some(gate) = &self.submit_gate {
            gate.notified().await;
        }
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }

    async fn fetch_tasks(&self, _limit: usize) -> Result<Vec<Task>, ClientError> {
        self.fetch_task_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.tasks
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    async fn fetch_workers(&self) -> Result<Vec<Worker>, ClientError> {
        self.fetch_worker_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.fetch_delay {
            tokio::time::sleep(delay).await;
        }
        self.workers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }
}
