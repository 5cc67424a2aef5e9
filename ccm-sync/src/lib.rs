//! CC Manager Sync Engine
//!
//! Keeps a local view of the remote task queue in step with the server.
//!
//! Architecture:
//! - View: the reconciled snapshot plus UI-local state, published to readers
//!   through a watch channel
//! - Synchronizer: one refresh cycle (fetch tasks and workers, reconcile)
//! - Scheduler: runs refresh cycles on a fixed interval, one at a time
//! - Submission: validates and sends new tasks, one at a time
//!
//! [`Session`] wires these together for a given configuration.

pub mod config;
pub mod error;
pub mod scheduler;
pub mod session;
pub mod submission;
pub mod synchronizer;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SyncConfig;
pub use error::{SyncError, ValidationError};
pub use scheduler::{PollScheduler, RefreshTask, RefreshTrigger, SchedulerStats};
pub use session::Session;
pub use submission::{SubmissionController, SubmitOutcome};
pub use synchronizer::{RefreshReport, Synchronizer};
pub use view::{
    Draft, Notice, NoticeLevel, StatusFilter, SyncStatus, TaskProjection, ViewModelStore,
    ViewState, filter_tasks,
};
