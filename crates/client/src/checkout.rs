//! The checkout demo flow.
//!
//! [`run_checkout`] fetches the manifest and the checkout metadata
//! concurrently, then posts the checkout request. It never fails outright:
//! the outcome, every response body that arrived, and a debug trace are
//! collected into a [`CheckoutReport`] for display.

use blink_checkout_core::{CheckoutCalls, CheckoutSession, DebugTrace, DerivedFacts, pretty};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::client::{BlinkClient, BlinkError, message_text};

/// Shown in place of a response that has not been loaded.
pub const NOT_LOADED: &str = "(not loaded)";

/// Shown when the checkout response carries no `message`.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "Checkout transaction generated.";

/// Pretty-printed response bodies, filled in as the calls complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponsePanels {
    /// `GET /actions.json`
    pub manifest: Option<String>,
    /// `GET /api/actions/checkout`
    pub metadata: Option<String>,
    /// `POST /api/actions/checkout`
    pub checkout: Option<String>,
}

/// Everything a checkout attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReport {
    /// URL the checkout request was posted to.
    pub checkout_url: String,
    pub panels: ResponsePanels,
    /// Success message. Set only when every call succeeded.
    pub message: Option<String>,
    /// Error message. Set only when a call failed.
    pub error: Option<String>,
    /// Base64 unsigned transaction returned by the checkout call.
    pub transaction: Option<String>,
    pub debug_trace: DebugTrace,
}

impl CheckoutReport {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The debug trace rendered as indented JSON.
    #[must_use]
    pub fn debug_trace_pretty(&self) -> String {
        pretty(&self.debug_trace)
    }
}

/// Run the checkout demo for `session`.
///
/// The manifest and metadata requests run concurrently. The checkout request
/// is sent only after both succeed. The first error ends the run.
#[instrument(skip_all, fields(sku = session.selected().sku, qty = %session.quantity()))]
pub async fn run_checkout(client: &BlinkClient, session: &CheckoutSession) -> CheckoutReport {
    let checkout_url = session.checkout_url();
    let mut panels = ResponsePanels::default();

    match checkout_calls(client, session, &mut panels).await {
        Ok((calls, post_body)) => {
            let message =
                message_text(&post_body).unwrap_or_else(|| DEFAULT_SUCCESS_MESSAGE.to_string());
            let transaction = post_body
                .get("transaction")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let derived = DerivedFacts::new(&checkout_url, &transaction);

            info!(
                transaction_chars = derived.transaction_base64_chars,
                elapsed_ms = calls.checkout_post.response.elapsed_ms,
                "Checkout transaction received"
            );

            CheckoutReport {
                checkout_url,
                panels,
                message: Some(message),
                error: None,
                transaction: (!transaction.is_empty()).then_some(transaction),
                debug_trace: DebugTrace::Success {
                    calls: Box::new(calls),
                    derived,
                },
            }
        }
        Err(err) => {
            warn!(error = %err, status = ?err.status(), "Checkout failed");

            let error = err.to_string();
            CheckoutReport {
                debug_trace: DebugTrace::Failure {
                    error: error.clone(),
                    checkout_url: checkout_url.clone(),
                    failed_call: err.trace().cloned().map(Box::new),
                },
                checkout_url,
                panels,
                message: None,
                error: Some(error),
                transaction: None,
            }
        }
    }
}

async fn checkout_calls(
    client: &BlinkClient,
    session: &CheckoutSession,
    panels: &mut ResponsePanels,
) -> Result<(CheckoutCalls, Value), BlinkError> {
    let (manifest, metadata) = tokio::try_join!(
        client.fetch_manifest(session),
        client.fetch_metadata(session)
    )?;

    panels.manifest = Some(pretty(&manifest.body));
    panels.metadata = Some(pretty(&metadata.body));

    let post = client.post_checkout(session).await?;
    panels.checkout = Some(pretty(&post.body));

    let calls = CheckoutCalls {
        actions_json: manifest.trace,
        checkout_metadata: metadata.trace,
        checkout_post: post.trace,
    };
    Ok((calls, post.body))
}
