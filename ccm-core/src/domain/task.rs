//! Task domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::id::RemoteId;
use super::timestamp::{iso8601, iso8601_opt};

/// One unit of work tracked by the task server
///
/// Owned by the server; the client holds read-only copies that are replaced
/// wholesale on every successful fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RemoteId,
    pub title: String,
    pub project: String,
    /// Full task body. The list endpoint omits it.
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub mode: TaskMode,
    pub status: TaskStatus,
    #[serde(with = "iso8601")]
    pub created_at: DateTime<Utc>,
    /// Worker executing the task, absent while queued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<RemoteId>,
    #[serde(
        default,
        with = "iso8601_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub finished_at: Option<DateTime<Utc>>,
    /// Execution output, only returned by the single-task endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

/// Task status as reported by the server
///
/// Transitions are owned by the server (queued -> running -> done/failed);
/// the client only displays the latest fetched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Queued,
    Running,
    Done,
    Failed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Queued,
        TaskStatus::Running,
        TaskStatus::Done,
        TaskStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Queued => "queued",
            TaskStatus::Running => "running",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }

    /// Whether the task reached a final state
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown task status '{}'", s))
    }
}

/// How the worker should handle a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    /// Carry out the prompt directly
    #[default]
    Execute,
    /// Produce a plan only
    Plan,
}

impl TaskMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskMode::Execute => "execute",
            TaskMode::Plan => "plan",
        }
    }
}

impl std::fmt::Display for TaskMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "execute" => Ok(TaskMode::Execute),
            "plan" => Ok(TaskMode::Plan),
            other => Err(format!("unknown task mode '{}'", other)),
        }
    }
}
