use crate::actor_framework::Entity;
use crate::domain::{PaymentAttempt, PaymentAttemptCreate, PaymentStatus};
use super::actions::PaymentAction;

impl Entity for PaymentAttempt {
    type Id = String;
    type CreateParams = PaymentAttemptCreate;
    type Patch = ();
    type Action = PaymentAction;
    type ActionResult = PaymentStatus;

    /// Records a new attempt in the `Created` state.
    fn from_create_params(id: String, params: PaymentAttemptCreate) -> Result<Self, String> {
        Ok(Self {
            receipt: id,
            user_id: params.user_id,
            course_id: params.course_id,
            plan: params.plan,
            amount_paise: params.amount_paise,
            currency: params.currency,
            order_id: None,
            status: PaymentStatus::Created,
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Ok(())
    }

    /// Applies a status transition.
    ///
    /// # Errors
    /// Verified attempts are final, and an order can only be attached once.
    fn handle_action(&mut self, action: PaymentAction) -> Result<PaymentStatus, String> {
        if self.status.is_terminal() {
            return Err(format!("attempt {} is already verified", self.receipt));
        }
        self.status = match action {
            PaymentAction::AttachOrder(order_id) => {
                if let Some(existing) = &self.order_id {
                    return Err(format!("attempt {} already has order {}", self.receipt, existing));
                }
                self.order_id = Some(order_id);
                PaymentStatus::OrderIssued
            }
            PaymentAction::MarkVerified(payment_id) => PaymentStatus::Verified { payment_id },
            PaymentAction::MarkFailed(reason) => PaymentStatus::Failed { reason },
            PaymentAction::MarkDismissed => PaymentStatus::Dismissed,
        };
        Ok(self.status.clone())
    }
}
