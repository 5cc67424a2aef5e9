//! Error types for the sync engine

use ccm_client::ClientError;
use thiserror::Error;

/// Errors surfaced by the sync engine
#[derive(Debug, Error)]
pub enum SyncError {
    /// Input rejected locally, no request was made
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The server could not be reached or gave an unusable answer
    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    /// Unexpected failure inside the engine
    #[error("Application error: {0}")]
    Application(String),
}

/// Local validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Task prompt cannot be empty")]
    EmptyPrompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err: SyncError = ValidationError::EmptyPrompt.into();
        assert_eq!(err.to_string(), "Task prompt cannot be empty");

        let err: SyncError = ClientError::api_error(502, "bad gateway").into();
        assert_eq!(
            err.to_string(),
            "Transport error: API error (status 502): bad gateway"
        );
    }
}
