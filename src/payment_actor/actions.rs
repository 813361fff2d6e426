/// Status transitions for a recorded payment attempt.
#[derive(Debug, Clone)]
pub enum PaymentAction {
    /// The backend issued an order for this receipt.
    AttachOrder(String),
    /// Verification succeeded; carries the gateway payment id.
    MarkVerified(String),
    /// The attempt ended with an error shown to the user.
    MarkFailed(String),
    /// The checkout widget was closed without paying.
    MarkDismissed,
}
