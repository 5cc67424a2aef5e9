//! Refresh cycle
//!
//! One cycle pulls the task and worker snapshots concurrently and hands both
//! outcomes to the view store. A failed fetch never clears what the view
//! already shows; it only marks the view as stale.

use async_trait::async_trait;
use ccm_client::TaskTransport;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use crate::error::SyncError;
use crate::scheduler::RefreshTask;
use crate::view::{ReconcileReport, ViewModelStore};

/// Outcome of a refresh cycle in which every fetch succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Sequence number of the cycle
    pub cycle: u64,
    pub task_count: usize,
    pub worker_count: usize,
    pub applied: ReconcileReport,
}

/// Fetches snapshots and reconciles them into the view store
pub struct Synchronizer {
    transport: Arc<dyn TaskTransport>,
    store: ViewModelStore,
    task_limit: usize,
    cycles: AtomicU64,
}

impl Synchronizer {
    /// Creates a new synchronizer
    ///
    /// # Arguments
    /// * `transport` - Where snapshots come from
    /// * `store` - Where they are reconciled into
    /// * `task_limit` - Maximum number of tasks requested per cycle
    pub fn new(
        transport: Arc<dyn TaskTransport>,
        store: ViewModelStore,
        task_limit: usize,
    ) -> Self {
        Self {
            transport,
            store,
            task_limit,
            cycles: AtomicU64::new(0),
        }
    }

    /// Runs one refresh cycle
    ///
    /// Both fetches are issued together and both finish before anything is
    /// applied. Whatever succeeded is reconciled even if the other fetch
    /// failed; the first failure is then returned.
    pub async fn refresh_once(&self) -> Result<RefreshReport, SyncError> {
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Refresh cycle {} starting", cycle);

        let (tasks, workers) = tokio::join!(
            self.transport.fetch_tasks(self.task_limit),
            self.transport.fetch_workers()
        );

        let (tasks, task_error) = split(tasks);
        let (workers, worker_error) = split(workers);

        let task_count = tasks.as_ref().map(Vec::len).unwrap_or_default();
        let worker_count = workers.as_ref().map(Vec::len).unwrap_or_default();

        let applied = self.store.reconcile_cycle(cycle, tasks, workers);

        if let Some(e) = &task_error {
            warn!("Cycle {}: task snapshot unavailable: {}", cycle, e);
        }
        if let Some(e) = &worker_error {
            warn!("Cycle {}: worker snapshot unavailable: {}", cycle, e);
        }

        if let Some(e) = task_error.or(worker_error) {
            return Err(SyncError::Transport(e));
        }

        let report = RefreshReport {
            cycle,
            task_count,
            worker_count,
            applied,
        };
        debug!(
            "Refresh cycle {} done: {} task(s), {} worker(s)",
            cycle, report.task_count, report.worker_count
        );

        Ok(report)
    }

    pub fn store(&self) -> &ViewModelStore {
        &self.store
    }
}

#[async_trait]
impl RefreshTask for Synchronizer {
    async fn refresh(&self) -> Result<(), SyncError> {
        self.refresh_once().await.map(|_| ())
    }
}

fn split<T, E>(result: Result<T, E>) -> (Option<T>, Option<E>) {
    match result {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ScriptedTransport, task, unavailable, worker};
    use ccm_client::ClientError;
    use ccm_core::domain::task::TaskStatus;
    use std::time::Duration;

    fn setup(transport: ScriptedTransport) -> (Arc<ScriptedTransport>, Synchronizer) {
        let transport = Arc::new(transport);
        let sync = Synchronizer::new(transport.clone(), ViewModelStore::new(), 20);
        (transport, sync)
    }

    #[tokio::test]
    async fn test_successful_cycle_reconciles_both() {
        let (transport, sync) = setup(ScriptedTransport::new());
        transport.push_tasks(Ok(vec![task(2, TaskStatus::Running), task(1, TaskStatus::Done)]));
        transport.push_workers(Ok(vec![worker(1, "busy"), worker(2, "idle")]));

        let report = sync.refresh_once().await.unwrap();
        assert_eq!(report.cycle, 1);
        assert_eq!(report.task_count, 2);
        assert_eq!(report.worker_count, 2);

        let state = sync.store().snapshot();
        assert_eq!(state.tasks.len(), 2);
        assert_eq!(state.workers.len(), 2);
        assert!(!state.sync.stale);
        assert!(state.sync.last_synced_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let (transport, sync) = setup(ScriptedTransport::new());
        transport.push_tasks(Ok(vec![
            task(3, TaskStatus::Queued),
            task(2, TaskStatus::Running),
            task(1, TaskStatus::Done),
        ]));
        transport.push_workers(Ok(vec![worker(1, "busy")]));
        sync.refresh_once().await.unwrap();

        transport.push_tasks(Err(unavailable()));
        transport.push_workers(Err(ClientError::ParseError("truncated".to_string())));
        let err = sync.refresh_once().await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));

        let state = sync.store().snapshot();
        assert_eq!(state.tasks.len(), 3);
        assert_eq!(state.workers.len(), 1);
        assert!(state.sync.stale);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_applied() {
        let (transport, sync) = setup(ScriptedTransport::new());
        transport.push_tasks(Ok(vec![task(1, TaskStatus::Queued)]));
        transport.push_workers(Ok(vec![worker(1, "idle")]));
        sync.refresh_once().await.unwrap();

        transport.push_tasks(Ok(vec![]));
        transport.push_workers(Ok(vec![]));
        sync.refresh_once().await.unwrap();

        let state = sync.store().snapshot();
        assert!(state.tasks.is_empty());
        assert!(state.workers.is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_applies_what_arrived() {
        let (transport, sync) = setup(ScriptedTransport::new());
        transport.push_tasks(Ok(vec![task(1, TaskStatus::Running)]));
        transport.push_workers(Err(unavailable()));

        assert!(sync.refresh_once().await.is_err());

        let state = sync.store().snapshot();
        assert_eq!(state.tasks.len(), 1);
        assert!(state.workers.is_empty());
        assert!(state.sync.stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_run_concurrently() {
        let (transport, sync) = setup(ScriptedTransport::slow(Duration::from_secs(1)));
        transport.push_tasks(Ok(vec![]));
        transport.push_workers(Ok(vec![]));

        let started = tokio::time::Instant::now();
        sync.refresh_once().await.unwrap();

        assert!(started.elapsed() < Duration::from_millis(1500));
        assert_eq!(
            transport.fetch_task_calls.load(Ordering::SeqCst)
                + transport.fetch_worker_calls.load(Ordering::SeqCst),
            2
        );
    }

    #[tokio::test]
    async fn test_cycle_numbers_increase() {
        let (transport, sync) = setup(ScriptedTransport::new());
        for _ in 0..3 {
            transport.push_tasks(Ok(vec![]));
            transport.push_workers(Ok(vec![]));
        }

        let mut cycles = Vec::new();
        for _ in 0..3 {
            cycles.push(sync.refresh_once().await.unwrap().cycle);
        }
        assert_eq!(cycles, vec![1, 2, 3]);
        assert_eq!(sync.store().snapshot().sync.latest_cycle, 3);
    }
}
