use async_trait::async_trait;
use tracing::{info, instrument};
use crate::domain::{CreateOrderRequest, PaymentOrder, VerifiedPayment, VerifyPaymentRequest};
use super::dto::{CreateOrderResponse, VerifyPaymentResponse};
use super::{ApiClient, ApiError};

/// The two payment endpoints the enrollment wizard depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentsApi: Send + Sync {
    /// `POST /payments/create-order`
    async fn create_order(&self, request: CreateOrderRequest) -> Result<PaymentOrder, ApiError>;
    /// `POST /payments/verify-payment`
    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<VerifiedPayment, ApiError>;
}

#[async_trait]
impl PaymentsApi for ApiClient {
    #[instrument(skip(self, request), fields(receipt = %request.receipt, amount = request.amount))]
    async fn create_order(&self, request: CreateOrderRequest) -> Result<PaymentOrder, ApiError> {
        let response: CreateOrderResponse = self.post_json("payments/create-order", &request).await?;
        let order = response.into_order()?;
        info!(order_id = %order.order_id, "Order created");
        Ok(order)
    }

    #[instrument(skip(self, request), fields(order_id = %request.razorpay_order_id))]
    async fn verify_payment(&self, request: VerifyPaymentRequest) -> Result<VerifiedPayment, ApiError> {
        let response: VerifyPaymentResponse = self.post_json("payments/verify-payment", &request).await?;
        let verified = response.into_verified()?;
        info!(payment_id = ?verified.payment_id, "Payment verified");
        Ok(verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{api_client, serve_once};
    use crate::domain::{OrderNotes, PaymentPlan};

    #[tokio::test]
    async fn test_create_order_round_trip() {
        let (url, request) = serve_once(
            200,
            r#"{"success":true,"data":{"order":{"id":"order_1","amount":100000,"currency":"INR"},"key_id":"rzp_test_k"}}"#,
        )
        .await;
        let (client, _session) = api_client(url, Some("jwt")).await;

        let order = client
            .create_order(CreateOrderRequest {
                amount: 100_000,
                currency: "INR".into(),
                receipt: "rcpt_1".into(),
                course_id: "c1".into(),
                notes: OrderNotes { course_id: "c1".into(), user_id: "u1".into(), payment_plan: PaymentPlan::Full },
            })
            .await
            .unwrap();
        assert_eq!(order.order_id, "order_1");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /api/payments/create-order "));
        assert!(raw.contains(r#""courseId":"c1""#));
    }

    #[tokio::test]
    async fn test_verify_rejection_surfaces_message() {
        let (url, request) = serve_once(200, r#"{"success":false,"message":"Signature mismatch"}"#).await;
        let (client, _session) = api_client(url, None).await;

        let result = client
            .verify_payment(VerifyPaymentRequest {
                razorpay_order_id: "order_1".into(),
                razorpay_payment_id: "pay_1".into(),
                razorpay_signature: "sig".into(),
                course_id: "c1".into(),
                user_id: "u1".into(),
                amount: 100_000,
                payment_plan: PaymentPlan::Installment,
            })
            .await;
        assert_eq!(result, Err(ApiError::Rejected("Signature mismatch".into())));
        assert!(request.await.unwrap().contains(r#""paymentPlan":"installment""#));
    }
}
