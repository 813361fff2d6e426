//! # Mock Framework
//!
//! Utilities for testing clients and the enrollment wizard in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, then helpers like
//! [`expect_create`] or [`expect_action`] to assert what the client sent and
//! to answer it. Wizard tests use the fixtures at the bottom instead: real
//! session and ledger actors, and a checkout host the test drives.

use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use crate::actor_framework::{Entity, FrameworkError, ResourceActor, ResourceClient, ResourceRequest};
use crate::api::PaymentsApi;
use crate::clients::PaymentClient;
use crate::domain::{PaymentAttempt, PaymentAttemptCreate, Session, User};
use crate::enrollment::{CheckoutBranding, FlowDeps};
use crate::gateway::{ChannelGateway, CheckoutOutcome, CheckoutSuccess, PendingCheckout};
use crate::session::{MemorySessionStorage, SessionClient, SessionService};

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so the test plays the
/// actor: it inspects each request and decides the reply.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::CreateParams, Reply<T::Id>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, T::Patch, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, patch, respond_to }) => Some((id, patch, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(receiver: &mut mpsc::Receiver<ResourceRequest<T>>) -> Option<(T::Id, T::Action, Reply<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

// =============================================================================
// Wizard fixtures
// =============================================================================

pub fn learner(profile_complete: bool) -> User {
    User {
        profile_complete,
        phone: profile_complete.then(|| "9845012345".to_string()),
        ..User::new("user_1", "Asha Menon", "asha@example.com")
    }
}

/// Session actor signed in as `user`, plus a view of its storage mirror.
pub async fn spawn_session(user: User) -> (SessionClient, MemorySessionStorage) {
    let storage = MemorySessionStorage::with_session(Session::new(user, "token_1"));
    let (service, client) = SessionService::start(8, Arc::new(storage.clone())).await;
    tokio::spawn(service.run());
    (client, storage)
}

pub fn spawn_ledger() -> PaymentClient {
    let (actor, inner) = ResourceActor::<PaymentAttempt>::new(16, |p: &PaymentAttemptCreate| p.receipt.clone());
    tokio::spawn(actor.run());
    PaymentClient::new(inner)
}

/// Everything a wizard needs, with the payments port supplied by the test.
pub struct FlowHarness {
    pub deps: FlowDeps,
    pub session: SessionClient,
    pub storage: MemorySessionStorage,
    pub ledger: PaymentClient,
    pub host: mpsc::Receiver<PendingCheckout>,
}

pub async fn flow_harness(user: User, payments: impl PaymentsApi + 'static) -> FlowHarness {
    let (session, storage) = spawn_session(user).await;
    let ledger = spawn_ledger();
    let (gateway, host) = ChannelGateway::new(4);
    let deps = FlowDeps {
        session: Arc::new(session.clone()),
        payments: Arc::new(payments),
        gateway: Arc::new(gateway),
        ledger: ledger.clone(),
        branding: CheckoutBranding::default(),
    };
    FlowHarness { deps, session, storage, ledger, host }
}

/// What a well-behaved widget reports for `order_id`.
pub fn widget_success(order_id: &str) -> CheckoutSuccess {
    CheckoutSuccess {
        razorpay_payment_id: "pay_1".to_string(),
        razorpay_order_id: order_id.to_string(),
        razorpay_signature: "sig_ok".to_string(),
    }
}

/// Answers the next checkout the wizard opens.
pub async fn answer_next_checkout(host: &mut mpsc::Receiver<PendingCheckout>, outcome: CheckoutOutcome) -> PendingCheckoutView {
    let pending = host.recv().await.expect("Expected a checkout to open");
    let view = PendingCheckoutView {
        order_id: pending.options.order_id.clone(),
        key: pending.options.key.clone(),
        amount: pending.options.amount,
        contact: pending.options.prefill.contact.clone(),
    };
    pending.resolve(outcome);
    view
}

/// The parts of the checkout options tests assert on.
#[derive(Debug)]
pub struct PendingCheckoutView {
    pub order_id: String,
    pub key: String,
    pub amount: u64,
    pub contact: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PaymentPlan, PaymentStatus, CURRENCY};
    use crate::payment_actor::PaymentAction;

    #[tokio::test]
    async fn test_mock_client() {
        let (inner, mut receiver) = create_mock_client::<PaymentAttempt>(10);
        let ledger = PaymentClient::new(inner);

        let task = tokio::spawn(async move { ledger.mark_dismissed("rcpt_1".into()).await });

        let (id, action, responder) = expect_action(&mut receiver).await.expect("Expected Action request");
        assert_eq!(id, "rcpt_1");
        assert!(matches!(action, PaymentAction::MarkDismissed));
        responder.send(Ok(PaymentStatus::Dismissed)).unwrap();

        assert_eq!(task.await.unwrap(), Ok(PaymentStatus::Dismissed));
    }

    #[tokio::test]
    async fn test_mock_client_create() {
        let (inner, mut receiver) = create_mock_client::<PaymentAttempt>(10);
        let ledger = PaymentClient::new(inner);

        let task = tokio::spawn(async move {
            ledger
                .record_attempt(PaymentAttemptCreate {
                    receipt: "rcpt_2".into(),
                    user_id: "user_1".into(),
                    course_id: "c1".into(),
                    plan: PaymentPlan::Full,
                    amount_paise: 500,
                    currency: CURRENCY.into(),
                })
                .await
        });

        let (params, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(params.amount_paise, 500);
        responder.send(Err(FrameworkError::ActorClosed)).unwrap();

        let result = task.await.unwrap();
        assert!(result.is_err());
    }
}
