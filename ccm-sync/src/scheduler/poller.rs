//! Poll scheduler
//!
//! Drives refresh cycles: one immediately at start, then one per interval.
//! A cycle runs in its own task so the scheduler keeps observing ticks while
//! it is in flight; ticks that land during a cycle are skipped, not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::{RefreshTask, RefreshTrigger};
use crate::error::SyncError;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Counters describing what the scheduler has done so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    pub cycles_started: u64,
    pub cycles_failed: u64,
    pub ticks_skipped: u64,
    pub requests_coalesced: u64,
}

#[derive(Debug, Default)]
struct Counters {
    cycles_started: AtomicU64,
    cycles_failed: AtomicU64,
    ticks_skipped: AtomicU64,
    requests_coalesced: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> SchedulerStats {
        SchedulerStats {
            cycles_started: self.cycles_started.load(Ordering::SeqCst),
            cycles_failed: self.cycles_failed.load(Ordering::SeqCst),
            ticks_skipped: self.ticks_skipped.load(Ordering::SeqCst),
            requests_coalesced: self.requests_coalesced.load(Ordering::SeqCst),
        }
    }
}

/// How a cycle task ended
enum CycleEnd {
    Finished,
    Panicked,
}

/// Reports the end of a cycle when dropped, including on panic
struct CycleDone(mpsc::UnboundedSender<CycleEnd>);

impl Drop for CycleDone {
    fn drop(&mut self) {
        let end = if std::thread::panicking() {
            CycleEnd::Panicked
        } else {
            CycleEnd::Finished
        };
        let _ = self.0.send(end);
    }
}

/// Periodic refresh driver
///
/// Dropping the scheduler stops it as well, but only [`PollScheduler::stop`]
/// waits until the in-flight cycle is gone.
pub struct PollScheduler {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl PollScheduler {
    /// Starts the scheduler
    ///
    /// # Arguments
    /// * `task` - The refresh cycle to run
    /// * `interval` - Time between scheduled cycles
    /// * `trigger` - Source of out-of-cycle refresh requests
    pub fn start(task: Arc<dyn RefreshTask>, interval: Duration, trigger: RefreshTrigger) -> Self {
        let period = interval.max(MIN_INTERVAL);
        let (shutdown, shutdown_rx) = watch::channel(false);
        let counters = Arc::new(Counters::default());

        info!("Starting poll scheduler (interval: {:?})", period);

        let handle = tokio::spawn(run_loop(
            task,
            period,
            trigger,
            shutdown_rx,
            Arc::clone(&counters),
        ));

        Self {
            shutdown,
            handle: Some(handle),
            counters,
        }
    }

    /// Stops the scheduler
    ///
    /// Cancels the in-flight cycle, if any, and waits for it to be gone, so no
    /// refresh runs or applies results after this returns. Calling it again is
    /// a no-op.
    pub async fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        let _ = self.shutdown.send(true);

        if let Err(e) = handle.await {
            if e.is_panic() {
                error!("Poll scheduler task panicked: {}", e);
            }
        }

        info!("Poll scheduler stopped");
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn stats(&self) -> SchedulerStats {
        self.counters.snapshot()
    }
}

async fn run_loop(
    task: Arc<dyn RefreshTask>,
    period: Duration,
    trigger: RefreshTrigger,
    mut shutdown: watch::Receiver<bool>,
    counters: Arc<Counters>,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut in_flight: Option<JoinHandle<()>> = None;
    let mut follow_up = false;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.changed() => break,

            Some(end) = done_rx.recv() => {
                in_flight = None;

                if let CycleEnd::Panicked = end {
                    counters.cycles_failed.fetch_add(1, Ordering::SeqCst);
                    let e = SyncError::Application("refresh cycle panicked".to_string());
                    error!("{}", e);
                }

                if follow_up {
                    follow_up = false;
                    debug!("Running coalesced refresh request");
                    in_flight = Some(spawn_cycle(&task, &done_tx, &counters));
                }
            }

            _ = ticker.tick() => {
                if in_flight.is_some() {
                    counters.ticks_skipped.fetch_add(1, Ordering::SeqCst);
                    debug!("Refresh still in flight, skipping tick");
                } else {
                    in_flight = Some(spawn_cycle(&task, &done_tx, &counters));
                }
            }

            _ = trigger.requested() => {
                if in_flight.is_some() {
                    follow_up = true;
                    counters.requests_coalesced.fetch_add(1, Ordering::SeqCst);
                    debug!("Refresh requested while in flight, will follow up");
                } else {
                    debug!("Running requested refresh");
                    in_flight = Some(spawn_cycle(&task, &done_tx, &counters));
                }
            }
        }
    }

    if let Some(cycle) = in_flight.take() {
        debug!("Cancelling in-flight refresh cycle");
        cycle.abort();
        let _ = cycle.await;
    }
}

fn spawn_cycle(
    task: &Arc<dyn RefreshTask>,
    done: &mpsc::UnboundedSender<CycleEnd>,
    counters: &Arc<Counters>,
) -> JoinHandle<()> {
    let task = Arc::clone(task);
    let done = CycleDone(done.clone());
    let counters = Arc::clone(counters);
    let cycle = counters.cycles_started.fetch_add(1, Ordering::SeqCst) + 1;

    tokio::spawn(async move {
        let _done = done;

        if let Err(e) = task.refresh().await {
            counters.cycles_failed.fetch_add(1, Ordering::SeqCst);
            warn!("Refresh cycle {} failed: {:#}", cycle, e);
        }
    })
}
