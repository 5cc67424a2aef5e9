//! Scheduler layer
//!
//! Runs refresh cycles on a fixed interval, never more than one at a time,
//! and lets other components ask for an extra cycle right away.

pub mod poller;

pub use poller::{PollScheduler, SchedulerStats};

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::error::SyncError;

/// Work performed by one refresh cycle
#[async_trait]
pub trait RefreshTask: Send + Sync + 'static {
    /// Runs one cycle
    ///
    /// Errors are logged by the scheduler and do not stop it.
    async fn refresh(&self) -> Result<(), SyncError>;
}

/// Handle for requesting an out-of-cycle refresh
///
/// Requests made while a cycle is running collapse into a single follow-up
/// cycle. Clones share the same underlying signal.
#[derive(Debug, Clone, Default)]
pub struct RefreshTrigger {
    notify: Arc<Notify>,
}

impl RefreshTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Asks the scheduler for a refresh as soon as possible
    pub fn request(&self) {
        self.notify.notify_one();
    }

    pub(crate) async fn requested(&self) {
        self.notify.notified().await;
    }
}
