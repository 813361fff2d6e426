use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{info, warn};
use super::{CheckoutOutcome, CheckoutSuccess, PendingCheckout};

/// Presents each checkout on `out` and reads its outcome from `input`.
///
/// One line per checkout: the widget's success JSON, `fail: <reason>`, or
/// an empty line to dismiss. Runs until every gateway is dropped or the
/// input ends; checkouts left after end of input are dismissed.
pub async fn run_terminal_host<R, W>(
    mut checkouts: mpsc::Receiver<PendingCheckout>,
    input: R,
    mut out: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(pending) = checkouts.recv().await {
        let options = serde_json::to_string_pretty(&pending.options).map_err(std::io::Error::other)?;
        let prompt = format!(
            "{options}\nPaste the success JSON, type `fail: <reason>`, or press enter to dismiss:\n"
        );
        out.write_all(prompt.as_bytes()).await?;
        out.flush().await?;

        let line = lines.next_line().await?.unwrap_or_default();
        let outcome = parse_outcome(&line);
        info!(order_id = %pending.options.order_id, "Checkout answered");
        if !pending.resolve(outcome) {
            warn!("Checkout was abandoned before it was answered");
        }
    }
    Ok(())
}

fn parse_outcome(line: &str) -> CheckoutOutcome {
    let line = line.trim();
    if line.is_empty() {
        return CheckoutOutcome::Dismissed;
    }
    if let Some(reason) = line.strip_prefix("fail:") {
        return CheckoutOutcome::Failed { description: reason.trim().to_string() };
    }
    match serde_json::from_str::<CheckoutSuccess>(line) {
        Ok(success) => CheckoutOutcome::Success(success),
        Err(e) => {
            warn!(error = %e, "Unreadable checkout response");
            CheckoutOutcome::Failed { description: format!("Unreadable checkout response: {e}") }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderNotes, PaymentPlan};
    use crate::gateway::{ChannelGateway, CheckoutOptions, PaymentGateway, Prefill, Theme};

    fn options(order_id: &str) -> CheckoutOptions {
        CheckoutOptions {
            key: "rzp_test".into(),
            amount: 50_000,
            currency: "INR".into(),
            order_id: order_id.into(),
            name: "Academy".into(),
            description: "Contract Law".into(),
            prefill: Prefill { name: "A".into(), email: "a@b.c".into(), contact: String::new() },
            notes: OrderNotes { course_id: "c1".into(), user_id: "u1".into(), payment_plan: PaymentPlan::Full },
            theme: Theme { color: "#3399cc".into() },
        }
    }

    #[test]
    fn test_parse_outcome() {
        assert_eq!(parse_outcome("  "), CheckoutOutcome::Dismissed);
        assert_eq!(
            parse_outcome("fail: card declined"),
            CheckoutOutcome::Failed { description: "card declined".into() }
        );
        let success = parse_outcome(
            r#"{"razorpay_payment_id":"pay_9","razorpay_order_id":"order_9","razorpay_signature":"s"}"#,
        );
        assert!(matches!(success, CheckoutOutcome::Success(s) if s.razorpay_payment_id == "pay_9"));
        assert!(matches!(parse_outcome("{oops"), CheckoutOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_host_answers_checkouts_in_order() {
        let (gateway, checkouts) = ChannelGateway::new(2);
        let first = gateway.create_checkout_session(options("order_1")).await.unwrap();
        let second = gateway.create_checkout_session(options("order_2")).await.unwrap();
        drop(gateway);

        let mut printed = Vec::new();
        run_terminal_host(checkouts, &b"fail: no funds\n"[..], &mut printed).await.unwrap();

        assert_eq!(first.on_result().await, CheckoutOutcome::Failed { description: "no funds".into() });
        assert_eq!(second.on_result().await, CheckoutOutcome::Dismissed);
        let printed = String::from_utf8(printed).unwrap();
        assert!(printed.contains("\"order_id\": \"order_1\""));
    }
}
