use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment attempt not found: {0}")]
    NotFound(String),
    #[error("Invalid payment transition: {0}")]
    InvalidTransition(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<crate::actor_framework::FrameworkError> for PaymentError {
    fn from(error: crate::actor_framework::FrameworkError) -> Self {
        use crate::actor_framework::FrameworkError;
        match error {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Rejected(reason) => Self::InvalidTransition(reason),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
