//! Worker domain model
//!
//! Represents one execution slot in the remote worker pool.

use serde::{Deserialize, Serialize};

use super::id::RemoteId;

/// An execution slot in the remote pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique identifier for the worker
    pub id: RemoteId,

    /// Current status of the worker
    pub status: WorkerStatus,

    /// Task being executed, present only while the worker is active
    #[serde(default)]
    pub current_task_id: Option<RemoteId>,

    /// Project whose worktree the worker is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// Status of a worker
///
/// The pool may report states beyond idle/busy (e.g. "running",
/// "committing"); those are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkerStatus {
    /// Waiting for a task
    Idle,

    /// Executing a task
    Busy,

    /// Any other pool-defined state
    Other(String),
}

impl WorkerStatus {
    pub fn as_str(&self) -> &str {
        match self {
            WorkerStatus::Idle => "idle",
            WorkerStatus::Busy => "busy",
            WorkerStatus::Other(s) => s,
        }
    }

    /// Whether the worker is doing something other than waiting
    pub fn is_active(&self) -> bool {
        !matches!(self, WorkerStatus::Idle)
    }
}

impl From<String> for WorkerStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "idle" => WorkerStatus::Idle,
            "busy" => WorkerStatus::Busy,
            _ => WorkerStatus::Other(s),
        }
    }
}

impl From<WorkerStatus> for String {
    fn from(status: WorkerStatus) -> Self {
        match status {
            WorkerStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for WorkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pool_defined_status_survives_round_trip() {
        let worker: Worker = serde_json::from_value(json!({
            "id": 2,
            "status": "committing",
            "current_task_id": 9
        }))
        .unwrap();

        assert_eq!(worker.status, WorkerStatus::Other("committing".to_string()));
        assert!(worker.status.is_active());
        assert_eq!(worker.current_task_id, Some(RemoteId::Number(9)));

        let value = serde_json::to_value(&worker).unwrap();
        assert_eq!(value["status"], "committing");
    }

    #[test]
    fn test_idle_worker() {
        let worker: Worker = serde_json::from_value(json!({
            "id": 1,
            "status": "idle"
        }))
        .unwrap();

        assert_eq!(worker.status, WorkerStatus::Idle);
        assert!(!worker.status.is_active());
        assert!(worker.current_task_id.is_none());
    }
}
