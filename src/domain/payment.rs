use serde::{Deserialize, Serialize};
use super::PaymentPlan;

/// Currency every order is raised in.
pub const CURRENCY: &str = "INR";

/// Server-issued order, consumed once to open the checkout widget.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: u64,
    pub currency: String,
    pub key_id: String,
}

/// Free-form context attached to an order and echoed back by the widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotes {
    pub course_id: String,
    pub user_id: String,
    pub payment_plan: PaymentPlan,
}

/// Body of `POST /payments/create-order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in paise.
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    pub notes: OrderNotes,
}

/// Body of `POST /payments/verify-payment`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
    #[serde(rename = "courseId")]
    pub course_id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub amount: u64,
    #[serde(rename = "paymentPlan")]
    pub payment_plan: PaymentPlan,
}

/// Backend confirmation that a payment signature checked out.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPayment {
    pub payment_id: Option<String>,
}

/// Where a local payment attempt stands.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentStatus {
    Created,
    OrderIssued,
    Verified { payment_id: String },
    Failed { reason: String },
    Dismissed,
}

impl PaymentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Verified { .. })
    }
}

/// Local ledger entry for one checkout attempt, keyed by its receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentAttempt {
    pub receipt: String,
    pub user_id: String,
    pub course_id: String,
    pub plan: PaymentPlan,
    pub amount_paise: u64,
    pub currency: String,
    pub order_id: Option<String>,
    pub status: PaymentStatus,
}

/// Payload for recording a new attempt.
#[derive(Debug, Clone)]
pub struct PaymentAttemptCreate {
    pub receipt: String,
    pub user_id: String,
    pub course_id: String,
    pub plan: PaymentPlan,
    pub amount_paise: u64,
    pub currency: String,
}

/// Receipt ids stay within the gateway's 40 character limit.
pub fn new_receipt() -> String {
    format!("rcpt_{}", uuid::Uuid::new_v4().simple())
}
