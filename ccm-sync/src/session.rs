//! Session wiring
//!
//! Builds the store, synchronizer, submission controller and scheduler for a
//! configuration and tears them down in the right order.

use ccm_client::{ManagerClient, TaskTransport};
use std::sync::Arc;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::SyncError;
use crate::scheduler::{PollScheduler, RefreshTrigger, SchedulerStats};
use crate::submission::SubmissionController;
use crate::synchronizer::Synchronizer;
use crate::view::ViewModelStore;

/// A connected view of one task server
pub struct Session {
    config: SyncConfig,
    store: ViewModelStore,
    synchronizer: Arc<Synchronizer>,
    submissions: SubmissionController,
    trigger: RefreshTrigger,
    scheduler: Option<PollScheduler>,
}

impl Session {
    /// Creates a session talking HTTP to `config.server_url`
    pub fn connect(config: &SyncConfig) -> Result<Self, SyncError> {
        let client = ManagerClient::with_timeout(&config.server_url, config.request_timeout)?;
        Ok(Self::with_transport(config.clone(), Arc::new(client)))
    }

    /// Creates a session over an arbitrary transport
    pub fn with_transport(config: SyncConfig, transport: Arc<dyn TaskTransport>) -> Self {
        let store = ViewModelStore::with_project(config.default_project.clone());
        let trigger = RefreshTrigger::new();
        let synchronizer = Arc::new(Synchronizer::new(
            Arc::clone(&transport),
            store.clone(),
            config.task_limit,
        ));
        let submissions = SubmissionController::new(transport, store.clone(), trigger.clone());

        Self {
            config,
            store,
            synchronizer,
            submissions,
            trigger,
            scheduler: None,
        }
    }

    /// Starts background polling; does nothing if already started
    pub fn start_polling(&mut self) {
        if self.scheduler.is_some() {
            return;
        }

        let task = Arc::clone(&self.synchronizer);
        self.scheduler = Some(PollScheduler::start(
            task,
            self.config.poll_interval,
            self.trigger.clone(),
        ));
    }

    /// Suspends background polling
    ///
    /// The store stays open and keeps its snapshot; [`Session::start_polling`]
    /// resumes with an immediate refresh.
    pub async fn stop_polling(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop().await;
        }
    }

    /// Stops polling and closes the store
    ///
    /// Nothing reaches the store after this returns.
    pub async fn shutdown(&mut self) {
        self.stop_polling().await;
        self.store.close();
        info!("Session closed");
    }

    pub fn store(&self) -> &ViewModelStore {
        &self.store
    }

    pub fn synchronizer(&self) -> &Synchronizer {
        &self.synchronizer
    }

    pub fn submissions(&self) -> &SubmissionController {
        &self.submissions
    }

    pub fn trigger(&self) -> &RefreshTrigger {
        &self.trigger
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn scheduler_stats(&self) -> Option<SchedulerStats> {
        self.scheduler.as_ref().map(PollScheduler::stats)
    }
}
