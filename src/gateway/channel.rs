use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument, warn};
use super::{CheckoutHandle, CheckoutOptions, CheckoutOutcome, GatewayError, PaymentGateway};

/// A checkout waiting for its host to present it and report back.
#[derive(Debug)]
pub struct PendingCheckout {
    pub options: CheckoutOptions,
    responder: oneshot::Sender<CheckoutOutcome>,
}

impl PendingCheckout {
    /// Reports the outcome. Returns `false` when nobody is waiting anymore.
    pub fn resolve(self, outcome: CheckoutOutcome) -> bool {
        self.responder.send(outcome).is_ok()
    }
}

/// Gateway that forwards each checkout to a host task over a channel.
///
/// The host owns the actual widget (a browser, a terminal prompt, a test).
#[derive(Clone)]
pub struct ChannelGateway {
    sender: mpsc::Sender<PendingCheckout>,
}

impl ChannelGateway {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<PendingCheckout>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl PaymentGateway for ChannelGateway {
    #[instrument(skip(self, options), fields(order_id = %options.order_id, amount = options.amount))]
    async fn create_checkout_session(&self, options: CheckoutOptions) -> Result<CheckoutHandle, GatewayError> {
        if options.key.trim().is_empty() {
            return Err(GatewayError::InvalidOptions("missing key".to_string()));
        }
        if options.order_id.trim().is_empty() {
            return Err(GatewayError::InvalidOptions("missing order id".to_string()));
        }
        let (responder, outcome) = oneshot::channel();
        let handle = CheckoutHandle::new(options.order_id.clone(), outcome);
        self.sender
            .send(PendingCheckout { options, responder })
            .await
            .map_err(|_| {
                warn!("Checkout host is not running");
                GatewayError::Unavailable("checkout host closed".to_string())
            })?;
        info!("Checkout opened");
        Ok(handle)
    }
}
