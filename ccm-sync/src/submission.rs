//! Task submission
//!
//! Validates a prompt, sends it to the server and reflects the outcome in the
//! view store. Only one submission can be in flight at a time.

use ccm_client::TaskTransport;
use ccm_core::domain::task::TaskMode;
use ccm_core::dto::task::CreateTask;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{SyncError, ValidationError};
use crate::scheduler::RefreshTrigger;
use crate::view::{Notice, ViewModelStore};

/// Result of a submission attempt that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The server accepted the task
    Submitted,
    /// Another submission was already in flight; nothing was sent
    AlreadyInFlight,
}

/// Sends new tasks to the server
#[derive(Clone)]
pub struct SubmissionController {
    transport: Arc<dyn TaskTransport>,
    store: ViewModelStore,
    trigger: RefreshTrigger,
}

impl SubmissionController {
    /// Creates a new submission controller
    ///
    /// # Arguments
    /// * `transport` - Where requests are sent
    /// * `store` - View store that receives notices and the in-flight flag
    /// * `trigger` - Used to request a refresh after a successful submission
    pub fn new(
        transport: Arc<dyn TaskTransport>,
        store: ViewModelStore,
        trigger: RefreshTrigger,
    ) -> Self {
        Self {
            transport,
            store,
            trigger,
        }
    }

    /// Submits a new task
    ///
    /// A prompt that is empty after trimming is rejected without a request.
    /// While another submission is in flight this returns
    /// [`SubmitOutcome::AlreadyInFlight`], sends nothing and leaves a warning
    /// notice; the draft is left as is so it can be sent afterwards. On
    /// failure the draft prompt is kept so the user can retry.
    pub async fn submit(
        &self,
        project: &str,
        prompt: &str,
        mode: TaskMode,
    ) -> Result<SubmitOutcome, SyncError> {
        if prompt.trim().is_empty() {
            let err = ValidationError::EmptyPrompt;
            self.store.notify(Notice::warning(err.to_string()));
            return Err(err.into());
        }

        let Some(_guard) = self.store.begin_submission() else {
            debug!("Submission already in flight, ignoring");
            self.store.notify(Notice::warning(
                "A submission is already in flight; prompt kept, send it again once it completes",
            ));
            return Ok(SubmitOutcome::AlreadyInFlight);
        };

        let req = CreateTask::from_prompt(project, prompt, mode);
        info!("Submitting task '{}' to project {} ({})", req.title, project, mode);

        match self.transport.submit_task(&req).await {
            Ok(()) => {
                self.store.clear_submitted_prompt(prompt);
                self.store
                    .notify(Notice::info(format!("Task submitted: {}", req.title)));
                self.trigger.request();
                Ok(SubmitOutcome::Submitted)
            }
            Err(e) => {
                warn!("Failed to submit task: {}", e);
                self.store
                    .notify(Notice::error(format!("Failed to submit task: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Submits the draft currently held in the view store
    pub async fn submit_draft(&self) -> Result<SubmitOutcome, SyncError> {
        let draft = self.store.draft();
        self.submit(&draft.project, &draft.prompt, draft.mode).await
    }
}
