//! Port to the hosted checkout widget, a channel-backed adapter, and a
//! terminal host for it.

mod channel;
mod error;
mod terminal;
mod types;

pub use channel::*;
pub use error::*;
pub use terminal::*;
pub use types::*;

use async_trait::async_trait;

/// Opens checkout sessions on the hosted payment widget.
///
/// Each session resolves exactly once through [`CheckoutHandle::on_result`].
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(&self, options: CheckoutOptions) -> Result<CheckoutHandle, GatewayError>;
}
