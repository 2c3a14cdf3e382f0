//! Request/response traces for the technical details panel.
//!
//! Traces serialize to camelCase JSON:
//!
//! ```json
//! {
//!   "request": { "url": "...", "method": "GET", "body": null },
//!   "response": {
//!     "status": 200,
//!     "ok": true,
//!     "elapsedMs": 12,
//!     "headers": { "content-type": "application/json" },
//!     "body": {}
//!   }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::action::decoded_len;

/// Characters of the transaction shown in the trace preview.
pub const TRANSACTION_PREVIEW_CHARS: usize = 96;

/// The request half of a [`CallTrace`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestTrace {
    pub url: String,
    pub method: String,
    /// JSON request body, `null` when none was sent.
    pub body: Value,
}

/// The response half of a [`CallTrace`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseTrace {
    pub status: u16,
    /// Whether `status` is in the 2xx range.
    pub ok: bool,
    /// Wall time from send to headers, rounded to whole milliseconds.
    pub elapsed_ms: u64,
    /// Response headers keyed by lower-case name.
    pub headers: BTreeMap<String, String>,
    /// Parsed JSON body, `{}` when the body was not JSON.
    pub body: Value,
}

/// One HTTP call as seen by the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallTrace {
    pub request: RequestTrace,
    pub response: ResponseTrace,
}

/// Traces of the three calls a checkout makes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutCalls {
    /// `GET /actions.json`
    pub actions_json: CallTrace,
    /// `GET /api/actions/checkout`
    pub checkout_metadata: CallTrace,
    /// `POST /api/actions/checkout`
    pub checkout_post: CallTrace,
}

/// Facts derived from a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFacts {
    pub checkout_url: String,
    /// Length of the base64 transaction.
    pub transaction_base64_chars: usize,
    /// Leading characters of the base64 transaction.
    pub transaction_preview: String,
    /// Decoded transaction size, absent when there is no valid transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_bytes: Option<usize>,
}

impl DerivedFacts {
    /// Derive the facts for `transaction` posted to `checkout_url`.
    #[must_use]
    pub fn new(checkout_url: &str, transaction: &str) -> Self {
        Self {
            checkout_url: checkout_url.to_string(),
            transaction_base64_chars: transaction.chars().count(),
            transaction_preview: transaction.chars().take(TRANSACTION_PREVIEW_CHARS).collect(),
            transaction_bytes: if transaction.is_empty() {
                None
            } else {
                decoded_len(transaction)
            },
        }
    }
}

/// The trace shown after a checkout attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DebugTrace {
    /// All three calls succeeded.
    Success {
        calls: Box<CheckoutCalls>,
        derived: DerivedFacts,
    },
    /// A call failed.
    Failure {
        error: String,
        #[serde(rename = "checkoutUrl")]
        checkout_url: String,
        /// The call that returned a non-success status, if it got that far.
        #[serde(rename = "failedCall", skip_serializing_if = "Option::is_none")]
        failed_call: Option<Box<CallTrace>>,
    },
}

impl DebugTrace {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Render a value as JSON with two-space indentation.
#[must_use]
pub fn pretty<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unprintable: {e}>"))
}
