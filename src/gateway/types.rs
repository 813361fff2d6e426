use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use crate::domain::OrderNotes;

/// Options handed to the widget when it opens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutOptions {
    pub key: String,
    /// Amount in paise.
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
    pub name: String,
    pub description: String,
    pub prefill: Prefill,
    pub notes: OrderNotes,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prefill {
    pub name: String,
    pub email: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    pub color: String,
}

/// Values the widget passes to its success handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSuccess {
    pub razorpay_payment_id: String,
    pub razorpay_order_id: String,
    pub razorpay_signature: String,
}

/// How a checkout session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutOutcome {
    Success(CheckoutSuccess),
    /// The widget's `payment.failed` event.
    Failed { description: String },
    /// The widget was closed without a payment.
    Dismissed,
}

/// Receiving side of one open checkout session.
#[derive(Debug)]
pub struct CheckoutHandle {
    order_id: String,
    outcome: oneshot::Receiver<CheckoutOutcome>,
}

impl CheckoutHandle {
    pub fn new(order_id: impl Into<String>, outcome: oneshot::Receiver<CheckoutOutcome>) -> Self {
        Self { order_id: order_id.into(), outcome }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Waits for the session to end. A host that goes away without
    /// answering counts as a dismissal.
    pub async fn on_result(self) -> CheckoutOutcome {
        self.outcome.await.unwrap_or(CheckoutOutcome::Dismissed)
    }
}
