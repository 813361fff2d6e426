use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CourseError {
    #[error("Course not found: {0}")]
    NotFound(String),
    #[error("Course has no id: {0}")]
    MissingId(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<crate::actor_framework::FrameworkError> for CourseError {
    fn from(error: crate::actor_framework::FrameworkError) -> Self {
        use crate::actor_framework::FrameworkError;
        match error {
            FrameworkError::NotFound(id) => Self::NotFound(id),
            FrameworkError::Rejected(reason) => Self::MissingId(reason),
            other => Self::ActorCommunicationError(other.to_string()),
        }
    }
}
