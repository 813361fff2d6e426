use tracing::{debug, info, instrument};
use crate::actor_framework::ResourceClient;
use crate::domain::{PaymentAttempt, PaymentAttemptCreate, PaymentStatus};
use crate::payment_actor::{PaymentAction, PaymentError};

/// Client for the payment ledger actor.
#[derive(Clone)]
pub struct PaymentClient {
    inner: ResourceClient<PaymentAttempt>,
}

impl_basic_client!(PaymentClient, PaymentAttempt, PaymentError, payment);

impl PaymentClient {
    #[instrument(skip(self, attempt), fields(receipt = %attempt.receipt, course_id = %attempt.course_id))]
    pub async fn record_attempt(&self, attempt: PaymentAttemptCreate) -> Result<String, PaymentError> {
        debug!("Sending request");
        self.inner.create(attempt).await.map_err(PaymentError::from)
    }

    #[instrument(skip(self))]
    pub async fn attach_order(&self, receipt: String, order_id: String) -> Result<PaymentStatus, PaymentError> {
        self.transition(receipt, PaymentAction::AttachOrder(order_id)).await
    }

    #[instrument(skip(self))]
    pub async fn mark_verified(&self, receipt: String, payment_id: String) -> Result<PaymentStatus, PaymentError> {
        self.transition(receipt, PaymentAction::MarkVerified(payment_id)).await
    }

    #[instrument(skip(self))]
    pub async fn mark_failed(&self, receipt: String, reason: String) -> Result<PaymentStatus, PaymentError> {
        self.transition(receipt, PaymentAction::MarkFailed(reason)).await
    }

    #[instrument(skip(self))]
    pub async fn mark_dismissed(&self, receipt: String) -> Result<PaymentStatus, PaymentError> {
        self.transition(receipt, PaymentAction::MarkDismissed).await
    }

    /// All attempts made by one user, for the payment-management view.
    #[instrument(skip(self))]
    pub async fn history(&self, user_id: &str) -> Result<Vec<PaymentAttempt>, PaymentError> {
        let attempts: Vec<PaymentAttempt> = self
            .all_payments()
            .await?
            .into_iter()
            .filter(|attempt| attempt.user_id == user_id)
            .collect();
        info!(count = attempts.len(), "Loaded payment history");
        Ok(attempts)
    }

    async fn transition(&self, receipt: String, action: PaymentAction) -> Result<PaymentStatus, PaymentError> {
        debug!(?action, "Sending request");
        self.inner.perform_action(receipt, action).await.map_err(PaymentError::from)
    }
}
