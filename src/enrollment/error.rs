use thiserror::Error;
use crate::api::ApiError;
use crate::gateway::GatewayError;
use crate::session::SessionError;
use super::WizardStep;

/// Everything the wizard can refuse or fail with. Each one ends the
/// current attempt; the user retries by repeating the action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EnrollmentError {
    #[error("Course information is missing, cannot start payment")]
    MissingCourseId,
    #[error("Please sign in to enroll")]
    NotAuthenticated,
    #[error("Please fill in all required fields: {}", .0.join(", "))]
    IncompleteProfile(Vec<&'static str>),
    #[error("Please select a payment plan")]
    NoPlanSelected,
    #[error("Cannot {action} on the {step} step")]
    InvalidStep { action: &'static str, step: WizardStep },
    #[error("A payment is already being processed")]
    PaymentInProgress,
    #[error("No checkout is open")]
    NoOpenCheckout,
    #[error("Failed to initiate payment: {0}")]
    OrderCreation(ApiError),
    #[error("Payment verification failed: {0}")]
    Verification(ApiError),
    #[error("Failed to open checkout: {0}")]
    Gateway(#[from] GatewayError),
    #[error("Payment failed: {0}")]
    PaymentFailed(String),
    #[error("This course is already paid for")]
    AlreadyPaid,
    #[error("No verified payment to enroll with")]
    NoVerifiedPayment,
    #[error("Payment succeeded but the enrollment could not be saved: {0}")]
    EnrollmentNotRecorded(SessionError),
    #[error("Session error: {0}")]
    Session(SessionError),
}

impl From<SessionError> for EnrollmentError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::NotAuthenticated => Self::NotAuthenticated,
            other => Self::Session(other),
        }
    }
}
