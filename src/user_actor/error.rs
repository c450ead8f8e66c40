use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// A draft with an empty field never reaches a store.
    #[error("User validation skipped: {0} is required")]
    ValidationSkipped(&'static str),
    #[error("Network failure: {0}")]
    NetworkFailure(String),
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(error: FrameworkError) -> Self {
        match error {
            FrameworkError::Rejected(reason) => UserError::Rejected(reason),
            other => UserError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<reqwest::Error> for UserError {
    fn from(error: reqwest::Error) -> Self {
        UserError::NetworkFailure(error.to_string())
    }
}
