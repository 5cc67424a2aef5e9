//! Task DTOs for communication with the task server

use serde::{Deserialize, Serialize};

use crate::domain::task::TaskMode;

/// Maximum number of characters of the prompt used as the task title
pub const TITLE_MAX_CHARS: usize = 50;

/// Request body for `POST /api/tasks`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTask {
    pub project: String,
    pub title: String,
    pub prompt: String,
    pub mode: TaskMode,
}

impl CreateTask {
    /// Builds a request whose title is derived from the prompt
    ///
    /// The prompt itself is sent verbatim.
    pub fn from_prompt(
        project: impl Into<String>,
        prompt: impl Into<String>,
        mode: TaskMode,
    ) -> Self {
        let prompt = prompt.into();
        Self {
            project: project.into(),
            title: derive_title(&prompt),
            prompt,
            mode,
        }
    }
}

/// Derives a display title from a prompt
///
/// The first [`TITLE_MAX_CHARS`] characters of the prompt, taken as typed
/// and never splitting a character.
pub fn derive_title(prompt: &str) -> String {
    prompt.chars().take(TITLE_MAX_CHARS).collect()
}
