//! View model store
//!
//! Single owner of [`ViewState`]. Every mutation goes through the store and is
//! published to subscribers via a `tokio::sync::watch` channel, so readers
//! always see a consistent snapshot and are woken when it changes.

use ccm_core::domain::task::{Task, TaskMode};
use ccm_core::domain::worker::Worker;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use super::projection::filter_tasks;
use super::state::{Draft, Notice, StatusFilter, ViewState};

/// Which collections a reconciliation actually replaced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub tasks_applied: bool,
    pub workers_applied: bool,
}

/// Handle to the view state
///
/// Cheap to clone; all clones share the same state.
#[derive(Debug, Clone)]
pub struct ViewModelStore {
    state: Arc<watch::Sender<ViewState>>,
}

impl ViewModelStore {
    /// Creates an empty store
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ViewState::default());
        Self {
            state: Arc::new(tx),
        }
    }

    /// Creates an empty store whose draft targets `project`
    pub fn with_project(project: impl Into<String>) -> Self {
        let store = Self::new();
        let project = project.into();
        store.state.send_modify(|s| s.draft.project = project);
        store
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.subscribe()
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Tasks of the current snapshot matching `filter`
    pub fn filtered_tasks(&self, filter: StatusFilter) -> Vec<Task> {
        filter_tasks(&self.state.borrow().tasks, filter)
    }

    // =============================================================================
    // Reconciliation
    // =============================================================================

    /// Replaces the provided collections wholesale
    ///
    /// `None` means "no fresh snapshot" and keeps what is currently held; it
    /// never clears the view.
    pub fn reconcile(&self, tasks: Option<Vec<Task>>, workers: Option<Vec<Worker>>) {
        self.mutate(|s| {
            let changed = tasks.is_some() || workers.is_some();
            if let Some(tasks) = tasks {
                replace_tasks(s, tasks);
            }
            if let Some(workers) = workers {
                s.workers = Arc::new(workers);
            }
            changed
        });
    }

    /// Applies the results of refresh cycle `cycle`
    ///
    /// A collection is only replaced if no newer cycle has already been
    /// applied to it; results that arrive out of order are dropped. The stale
    /// flag follows the newest cycle seen: it is set if that cycle could not
    /// fetch everything, and cleared once a cycle fetches both collections.
    pub fn reconcile_cycle(
        &self,
        cycle: u64,
        tasks: Option<Vec<Task>>,
        workers: Option<Vec<Worker>>,
    ) -> ReconcileReport {
        let complete = tasks.is_some() && workers.is_some();
        let mut report = ReconcileReport::default();

        self.mutate(|s| {
            if let Some(tasks) = tasks {
                if cycle >= s.sync.tasks_cycle {
                    replace_tasks(s, tasks);
                    s.sync.tasks_cycle = cycle;
                    report.tasks_applied = true;
                } else {
                    debug!(
                        "Dropping tasks from cycle {} (cycle {} already applied)",
                        cycle, s.sync.tasks_cycle
                    );
                }
            }

            if let Some(workers) = workers {
                if cycle >= s.sync.workers_cycle {
                    s.workers = Arc::new(workers);
                    s.sync.workers_cycle = cycle;
                    report.workers_applied = true;
                } else {
                    debug!(
                        "Dropping workers from cycle {} (cycle {} already applied)",
                        cycle, s.sync.workers_cycle
                    );
                }
            }

            if cycle >= s.sync.latest_cycle {
                s.sync.latest_cycle = cycle;
                s.sync.stale = !complete;
                if complete {
                    s.sync.last_synced_at = Some(Utc::now());
                }
            }

            true
        });

        report
    }

    // =============================================================================
    // UI-local state
    // =============================================================================

    pub fn set_filter(&self, filter: StatusFilter) {
        self.mutate(|s| {
            let changed = s.filter != filter;
            s.filter = filter;
            changed
        });
    }

    pub fn set_draft_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.mutate(|s| {
            s.draft.prompt = prompt;
            true
        });
    }

    pub fn set_draft_project(&self, project: impl Into<String>) {
        let project = project.into();
        self.mutate(|s| {
            s.draft.project = project;
            true
        });
    }

    pub fn set_draft_mode(&self, mode: TaskMode) {
        self.mutate(|s| {
            let changed = s.draft.mode != mode;
            s.draft.mode = mode;
            changed
        });
    }

    /// Clears the prompt text only if it is still `submitted`
    ///
    /// Project and mode are kept. Text typed while the submission was on the
    /// wire is kept too.
    pub fn clear_submitted_prompt(&self, submitted: &str) {
        self.mutate(|s| {
            if s.draft.prompt != submitted || submitted.is_empty() {
                return false;
            }
            s.draft.prompt.clear();
            true
        });
    }

    pub fn draft(&self) -> Draft {
        self.state.borrow().draft.clone()
    }

    /// Shows a message to the user, replacing the previous one
    pub fn notify(&self, notice: Notice) {
        self.mutate(|s| {
            s.notice = Some(notice);
            true
        });
    }

    pub fn clear_notice(&self) {
        self.mutate(|s| s.notice.take().is_some());
    }

    // =============================================================================
    // Submission flag
    // =============================================================================

    /// Marks a submission as in flight
    ///
    /// Returns `None` if one already is (or the store is closed). The flag is
    /// cleared when the returned guard is dropped, whatever the exit path.
    pub fn begin_submission(&self) -> Option<SubmissionGuard> {
        let acquired = self.state.send_if_modified(|s| {
            if s.submitting || s.closed {
                return false;
            }
            s.submitting = true;
            true
        });

        acquired.then(|| SubmissionGuard {
            store: self.clone(),
        })
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().submitting
    }

    // =============================================================================
    // Teardown
    // =============================================================================

    /// Stops accepting updates
    ///
    /// Results that arrive after this point (e.g. from a request that was
    /// already on the wire) are ignored.
    pub fn close(&self) {
        self.state.send_modify(|s| s.closed = true);
    }

    pub fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    fn mutate(&self, f: impl FnOnce(&mut ViewState) -> bool) -> bool {
        self.state.send_if_modified(|s| {
            if s.closed {
                debug!("View model store closed, ignoring update");
                return false;
            }
            f(s)
        })
    }
}

impl Default for ViewModelStore {
    fn default() -> Self {
        Self::new()
    }
}

fn replace_tasks(state: &mut ViewState, tasks: Vec<Task>) {
    state.tasks = Arc::new(tasks);
    state.sync.tasks_revision += 1;
}

/// Clears the in-flight submission flag on drop
#[derive(Debug)]
pub struct SubmissionGuard {
    store: ViewModelStore,
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.store.state.send_if_modified(|s| {
            let was_set = s.submitting;
            s.submitting = false;
            was_set
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{task, worker};
    use ccm_core::domain::task::TaskStatus;

    #[test]
    fn test_reconcile_replaces_wholesale() {
        let store = ViewModelStore::new();
        store.reconcile(
            Some(vec![task(2, TaskStatus::Queued), task(1, TaskStatus::Running)]),
            Some(vec![worker(1, "busy")]),
        );
        store.reconcile(Some(vec![task(3, TaskStatus::Queued)]), Some(vec![]));

        let state = store.snapshot();
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.tasks[0].id.to_string(), "3");
        assert!(state.workers.is_empty());
        assert_eq!(state.sync.tasks_revision, 2);
    }

    #[test]
    fn test_missing_snapshot_keeps_previous_data() {
        let store = ViewModelStore::new();
        store.reconcile(
            Some(vec![
                task(3, TaskStatus::Queued),
                task(2, TaskStatus::Running),
                task(1, TaskStatus::Done),
            ]),
            Some(vec![worker(1, "idle")]),
        );

        store.reconcile(None, None);

        let state = store.snapshot();
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(state.workers.len(), 1);
    }

    #[test]
    fn test_failed_cycle_marks_stale_without_clearing() {
        let store = ViewModelStore::new();
        store.reconcile_cycle(
            1,
            Some(vec![task(1, TaskStatus::Queued)]),
            Some(vec![worker(1, "idle")]),
        );
        let synced_at = store.snapshot().sync.last_synced_at;
        assert!(synced_at.is_some());
        assert!(!store.snapshot().sync.stale);

        store.reconcile_cycle(2, None, Some(vec![worker(1, "busy")]));

        let state = store.snapshot();
        assert!(state.sync.stale);
        assert_eq!(state.tasks.len(), 1);
        assert_eq!(state.workers[0].status.as_str(), "busy");
        assert_eq!(state.sync.last_synced_at, synced_at);

        store.reconcile_cycle(3, Some(vec![]), Some(vec![]));
        assert!(!store.snapshot().sync.stale);
    }

    #[test]
    fn test_out_of_order_cycle_results_are_dropped() {
        let store = ViewModelStore::new();
        let newer = store.reconcile_cycle(
            5,
            Some(vec![task(2, TaskStatus::Running)]),
            Some(vec![worker(1, "busy")]),
        );
        assert!(newer.tasks_applied && newer.workers_applied);

        let older = store.reconcile_cycle(
            4,
            Some(vec![task(2, TaskStatus::Queued)]),
            Some(vec![worker(1, "idle")]),
        );
        assert_eq!(older, ReconcileReport::default());

        let state = store.snapshot();
        assert_eq!(state.tasks[0].status, TaskStatus::Running);
        assert_eq!(state.workers[0].status.as_str(), "busy");
        assert_eq!(state.sync.latest_cycle, 5);
    }

    #[test]
    fn test_subscribers_see_changes() {
        let store = ViewModelStore::new();
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.reconcile(Some(vec![task(1, TaskStatus::Queued)]), None);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().tasks.len(), 1);

        // Same filter twice is not a change
        store.set_filter(StatusFilter::All);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_filter_is_applied_to_current_snapshot() {
        let store = ViewModelStore::new();
        store.reconcile(Some(vec![task(1, TaskStatus::Queued)]), None);
        store.set_filter(StatusFilter::Only(TaskStatus::Running));

        assert!(store.snapshot().filtered_tasks().is_empty());
        assert_eq!(store.filtered_tasks(StatusFilter::All).len(), 1);
    }

    #[test]
    fn test_submission_guard_is_exclusive_and_clears_on_drop() {
        let store = ViewModelStore::new();

        let guard = store.begin_submission().expect("first submission");
        assert!(store.is_submitting());
        assert!(store.begin_submission().is_none());

        drop(guard);
        assert!(!store.is_submitting());
        assert!(store.begin_submission().is_some());
    }

    #[test]
    fn test_closed_store_ignores_updates() {
        let store = ViewModelStore::new();
        store.reconcile(Some(vec![task(1, TaskStatus::Queued)]), None);
        store.close();

        store.reconcile(Some(vec![]), Some(vec![]));
        store.reconcile_cycle(9, Some(vec![]), None);
        store.notify(Notice::error("late"));

        let state = store.snapshot();
        assert!(state.closed);
        assert_eq!(state.tasks.len(), 1);
        assert!(state.notice.is_none());
        assert!(store.begin_submission().is_none());
    }

    #[test]
    fn test_draft_editing() {
        let store = ViewModelStore::with_project("deepcell");
        store.set_draft_prompt("fix bug");
        store.set_draft_mode(TaskMode::Plan);

        let draft = store.draft();
        assert_eq!(draft.project, "deepcell");
        assert_eq!(draft.prompt, "fix bug");
        assert_eq!(draft.mode, TaskMode::Plan);

        store.clear_submitted_prompt("fix bug");
        let draft = store.draft();
        assert!(draft.prompt.is_empty());
        assert_eq!(draft.project, "deepcell");
    }

    #[test]
    fn test_clear_submitted_prompt_keeps_newer_text() {
        let store = ViewModelStore::new();
        store.set_draft_prompt("second");

        store.clear_submitted_prompt("first");
        assert_eq!(store.draft().prompt, "second");

        store.clear_submitted_prompt("second");
        assert!(store.draft().prompt.is_empty());
    }
}
