//! View layer
//!
//! Holds the latest reconciled snapshot of tasks and workers together with
//! UI-local state (filter, draft, notices, submission flag), and derives the
//! filtered task list from it.

mod projection;
mod state;
mod store;

pub use projection::{TaskProjection, filter_tasks};
pub use state::{Draft, Notice, NoticeLevel, StatusFilter, SyncStatus, ViewState};
pub use store::{ReconcileReport, SubmissionGuard, ViewModelStore};
