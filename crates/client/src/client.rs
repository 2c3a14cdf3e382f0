//! HTTP client for Solana Action (Blink) endpoints.
//!
//! Every call goes through [`BlinkClient::request_json`], which times the
//! request, captures the response headers, parses the body as JSON, and
//! records all of it in a [`CallTrace`] for the technical details panel.
//!
//! There is no retry, timeout, or caching. The first failure is returned as
//! is.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use blink_checkout_core::{CallTrace, CheckoutSession, RequestTrace, ResponseTrace};
use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BlinkConfig;

/// Errors that can occur when calling a Blink server.
#[derive(Debug, Error)]
pub enum BlinkError {
    /// The request never got a response (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// Displays the server's `message` verbatim when it sent one.
    #[error("{message}")]
    Api {
        status: u16,
        message: String,
        trace: Box<CallTrace>,
    },

    /// The request URL could not be parsed.
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

impl BlinkError {
    /// The trace of the failed call, when the server responded.
    #[must_use]
    pub fn trace(&self) -> Option<&CallTrace> {
        match self {
            Self::Api { trace, .. } => Some(trace),
            _ => None,
        }
    }

    /// HTTP status of the failed call, when the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A successful JSON call: the parsed body and its trace.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonCall {
    pub body: Value,
    pub trace: CallTrace,
}

impl JsonCall {
    /// Decode the body into a typed response.
    ///
    /// # Errors
    ///
    /// Returns an error if the body does not have the shape of `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.body)
    }
}

/// Blink API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct BlinkClient {
    inner: Arc<BlinkClientInner>,
}

struct BlinkClientInner {
    client: reqwest::Client,
    user_agent: String,
}

impl BlinkClient {
    /// Create a new Blink API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BlinkConfig) -> Result<Self, BlinkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            inner: Arc::new(BlinkClientInner {
                client,
                user_agent: config.user_agent.clone(),
            }),
        })
    }

    /// Fetch the `actions.json` manifest.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    pub async fn fetch_manifest(&self, session: &CheckoutSession) -> Result<JsonCall, BlinkError> {
        self.request_json(&session.manifest_url(), Method::GET, None)
            .await
    }

    /// Fetch the checkout action metadata.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    pub async fn fetch_metadata(&self, session: &CheckoutSession) -> Result<JsonCall, BlinkError> {
        self.request_json(&session.metadata_url(), Method::GET, None)
            .await
    }

    /// Request an unsigned checkout transaction for the session's selection.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the server rejects it.
    pub async fn post_checkout(&self, session: &CheckoutSession) -> Result<JsonCall, BlinkError> {
        let body = serde_json::to_value(session.post_request())?;
        self.request_json(&session.checkout_url(), Method::POST, Some(&body))
            .await
    }

    /// Send a request and read the response as JSON.
    ///
    /// A response body that is not JSON is treated as `{}`. A non-success
    /// status becomes [`BlinkError::Api`] carrying the server's `message`, or
    /// `Request failed: {status}` when there is none.
    ///
    /// # Errors
    ///
    /// Returns error if the URL is invalid, the request cannot be sent, or
    /// the response status is not 2xx.
    #[instrument(skip(self, body))]
    pub async fn request_json(
        &self,
        url: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<JsonCall, BlinkError> {
        let target = Url::parse(url).map_err(|source| BlinkError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let started = Instant::now();
        let mut request = self.inner.client.request(method.clone(), target);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let elapsed_ms = round_millis(started.elapsed());

        let status = response.status();
        let headers = capture_headers(response.headers());
        let response_body = response
            .bytes()
            .await
            .map_or_else(|_| empty_object(), |bytes| parse_body(&bytes));

        debug!(status = status.as_u16(), elapsed_ms, "Blink response");

        let trace = CallTrace {
            request: RequestTrace {
                url: url.to_string(),
                method: method.to_string(),
                body: body.cloned().unwrap_or(Value::Null),
            },
            response: ResponseTrace {
                status: status.as_u16(),
                ok: status.is_success(),
                elapsed_ms,
                headers,
                body: response_body.clone(),
            },
        };

        if !status.is_success() {
            return Err(BlinkError::Api {
                status: status.as_u16(),
                message: error_message(&response_body, status.as_u16()),
                trace: Box::new(trace),
            });
        }

        Ok(JsonCall {
            body: response_body,
            trace,
        })
    }
}

impl std::fmt::Debug for BlinkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlinkClient")
            .field("user_agent", &self.inner.user_agent)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Parse a response body, falling back to `{}` when it is not JSON.
fn parse_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap_or_else(|_| empty_object())
}

/// The body's `message` as display text.
///
/// Strings are shown as is and other values as JSON. `null`, `false`, `0`,
/// and the empty string count as no message.
pub(crate) fn message_text(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|v| v.abs() < f64::EPSILON) => None,
        other => Some(other.to_string()),
    }
}

/// The user-facing message for a failed call.
fn error_message(body: &Value, status: u16) -> String {
    message_text(body).unwrap_or_else(|| format!("Request failed: {status}"))
}

/// Response headers keyed by lower-case name.
fn capture_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut captured = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        captured
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    captured
}

/// Round a duration to the nearest whole millisecond.
fn round_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros().saturating_add(500) / 1000).unwrap_or(u64::MAX)
}
