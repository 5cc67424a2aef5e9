//! View state
//!
//! The reconciled snapshot plus the UI-local fields that live next to it.

use ccm_core::domain::task::{Task, TaskMode, TaskStatus};
use ccm_core::domain::worker::Worker;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use std::sync::Arc;

use super::projection::filter_tasks;

/// Everything a presentation layer needs to render
///
/// Owned by [`super::ViewModelStore`]; readers only ever see it through a
/// shared borrow or a clone.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Latest task snapshot, in server order
    pub tasks: Arc<Vec<Task>>,

    /// Latest worker snapshot, in server order
    pub workers: Arc<Vec<Worker>>,

    /// Status filter applied to the task list
    pub filter: StatusFilter,

    /// A submission request is in flight
    pub submitting: bool,

    /// Task being composed
    pub draft: Draft,

    /// Most recent user-facing message
    pub notice: Option<Notice>,

    /// Freshness bookkeeping
    pub sync: SyncStatus,

    pub(crate) closed: bool,
}

impl ViewState {
    /// Tasks matching the current filter
    pub fn filtered_tasks(&self) -> Vec<Task> {
        filter_tasks(&self.tasks, self.filter)
    }

    /// Number of tasks per status in the current snapshot
    pub fn status_counts(&self) -> [(TaskStatus, usize); 4] {
        TaskStatus::ALL.map(|status| {
            let count = self.tasks.iter().filter(|t| t.status == status).count();
            (status, count)
        })
    }
}

/// Status filter for the task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Only(TaskStatus),
}

impl StatusFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => task.status == *status,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<TaskStatus>()
            .map(StatusFilter::Only)
            .map_err(|_| {
                format!(
                    "unknown filter '{}' (expected all, queued, running, done or failed)",
                    s
                )
            })
    }
}

impl From<TaskStatus> for StatusFilter {
    fn from(status: TaskStatus) -> Self {
        StatusFilter::Only(status)
    }
}

/// Task being composed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub project: String,
    pub prompt: String,
    pub mode: TaskMode,
}

/// Severity of a [`Notice`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A user-visible message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

/// Freshness of the displayed snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncStatus {
    /// End of the last cycle in which every fetch succeeded
    pub last_synced_at: Option<DateTime<Utc>>,

    /// The newest cycle had at least one failed fetch
    pub stale: bool,

    /// Bumped whenever the task sequence is replaced
    pub tasks_revision: u64,

    /// Newest refresh cycle applied to tasks / workers
    pub tasks_cycle: u64,
    pub workers_cycle: u64,

    /// Newest refresh cycle seen at all
    pub latest_cycle: u64,
}
