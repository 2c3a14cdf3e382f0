//! Integration tests for the Blink checkout client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p blink-checkout-integration-tests
//! ```
//!
//! The tests need no external services. Each one starts a [`StubBlink`]
//! server on an ephemeral localhost port. It serves `actions.json` and the
//! checkout action the way a real Blink server does, and it records every
//! request it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{OriginalUri, Query, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use blink_checkout_client::{BlinkClient, BlinkConfig};
use blink_checkout_core::{CheckoutSession, catalog};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Unsigned transaction returned by the stub (a few base64-encoded bytes).
pub const STUB_TRANSACTION: &str = "AQABAgMEBQYHCAkKCwwNDg8QERITFBUWFxgZGhscHR4fICEiIyQlJicoKSorLC0uLzAxMjM0NTY3ODk6Ozw9Pj9AQUJDREVGR0hJSktMTU5PUFFSU1RVVldYWVpbXF1eXw==";

/// Header the stub adds to every response.
pub const STUB_HEADER: &str = "x-stub-server";

/// How the stub server misbehaves, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    /// Every endpoint works.
    #[default]
    Healthy,
    /// `actions.json` answers 404 with a JSON `message`.
    ManifestMissing,
    /// The metadata endpoint answers 500 with an HTML body.
    MetadataHtmlError,
    /// The checkout response has a transaction but no `message`.
    CheckoutWithoutMessage,
    /// The checkout response carries a numeric `message`.
    CheckoutNumericMessage,
}

/// A request the stub received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query string.
    pub uri: String,
    pub content_type: Option<String>,
    /// JSON body, `null` for requests without one.
    pub body: Value,
}

#[derive(Debug, Default)]
struct StubState {
    scenario: Scenario,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl StubState {
    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

/// A running stub Blink server.
#[derive(Debug)]
pub struct StubBlink {
    /// Base URL, e.g. `http://127.0.0.1:54321`.
    pub base_url: String,
    state: Arc<StubState>,
}

impl StubBlink {
    /// Start a stub server for `scenario` on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(scenario: Scenario) -> Self {
        let state = Arc::new(StubState {
            scenario,
            ..StubState::default()
        });

        let app = Router::new()
            .route("/actions.json", get(actions_json))
            .route(
                "/api/actions/checkout",
                get(checkout_metadata).post(checkout_post),
            )
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub listener");
        let addr = listener.local_addr().expect("Stub listener has no address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Stub server failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    /// Requests received so far, in arrival order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// A client configuration pointing at this stub.
    #[must_use]
    pub fn config(&self) -> BlinkConfig {
        BlinkConfig {
            base_url: self.base_url.clone(),
            ..BlinkConfig::default()
        }
    }

    /// A client pointing at this stub.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn client(&self) -> BlinkClient {
        BlinkClient::new(&self.config()).expect("Failed to build client")
    }

    /// A default session pointing at this stub.
    #[must_use]
    pub fn session(&self) -> CheckoutSession {
        self.config().to_session()
    }
}

/// An address nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr: SocketAddr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{addr}")
}

// =============================================================================
// Handlers
// =============================================================================

fn with_stub_header(status: StatusCode, body: impl IntoResponse) -> Response {
    let mut response = (status, body).into_response();
    response.headers_mut().insert(
        HeaderName::from_static(STUB_HEADER),
        HeaderValue::from_static("blink"),
    );
    response
}

async fn actions_json(State(state): State<Arc<StubState>>) -> Response {
    state.record(RecordedRequest {
        method: "GET".to_string(),
        uri: "/actions.json".to_string(),
        content_type: None,
        body: Value::Null,
    });

    if state.scenario == Scenario::ManifestMissing {
        return with_stub_header(
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "actions.json is not published" })),
        );
    }

    with_stub_header(
        StatusCode::OK,
        Json(json!({
            "rules": [
                { "pathPattern": "/shop/*", "apiPath": "/api/actions/checkout" },
                { "pathPattern": "/*", "apiPath": "/api/actions/tip" }
            ]
        })),
    )
}

async fn checkout_metadata(State(state): State<Arc<StubState>>) -> Response {
    state.record(RecordedRequest {
        method: "GET".to_string(),
        uri: "/api/actions/checkout".to_string(),
        content_type: None,
        body: Value::Null,
    });

    if state.scenario == Scenario::MetadataHtmlError {
        return with_stub_header(
            StatusCode::INTERNAL_SERVER_ERROR,
            (
                [(header::CONTENT_TYPE, "text/html")],
                "<html><body>upstream exploded</body></html>",
            ),
        );
    }

    with_stub_header(
        StatusCode::OK,
        Json(json!({
            "type": "action",
            "icon": "https://solana.com/src/img/branding/solanaLogoMark.svg",
            "title": "Blink Shop Checkout",
            "description": "Pick an item and quantity to generate a checkout transaction.",
            "label": "Checkout",
            "links": { "actions": [{
                "href": "/api/actions/checkout?sku={sku}&qty={qty}",
                "label": "Pay Shop",
                "parameters": [
                    { "name": "sku", "label": "Item sku (coffee, sticker, hoodie)", "required": true, "type": "text" },
                    { "name": "qty", "label": "Quantity", "required": true, "type": "number", "min": 1.0 }
                ]
            }]}
        })),
    )
}

async fn checkout_post(
    State(state): State<Arc<StubState>>,
    OriginalUri(uri): OriginalUri,
    Query(params): Query<HashMap<String, String>>,
    headers: axum::http::HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.record(RecordedRequest {
        method: "POST".to_string(),
        uri: uri.to_string(),
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let bad_request =
        |message: String| with_stub_header(StatusCode::BAD_REQUEST, Json(json!({ "message": message })));

    if body.get("account").and_then(Value::as_str).is_none_or(str::is_empty) {
        return bad_request("Invalid account pubkey".to_string());
    }

    let Some(qty) = params.get("qty").and_then(|q| q.parse::<u64>().ok()) else {
        return bad_request("Invalid query parameter: qty".to_string());
    };
    if qty == 0 || qty > 20 {
        return bad_request("Quantity must be between 1 and 20".to_string());
    }

    let Some(item) = params.get("sku").and_then(|sku| catalog::find(sku)) else {
        return bad_request("Unknown sku. Use coffee, sticker, or hoodie".to_string());
    };

    let amount = item.price.saturating_mul(qty);
    let skip_balance_check = params
        .get("skip_balance_check")
        .is_some_and(|v| v.eq_ignore_ascii_case("true"));
    if !skip_balance_check {
        return bad_request(format!(
            "Insufficient balance: you have 0 SOL but need {} SOL + fees",
            amount.display_sol()
        ));
    }

    match state.scenario {
        Scenario::CheckoutWithoutMessage => {
            return with_stub_header(
                StatusCode::OK,
                Json(json!({ "transaction": STUB_TRANSACTION })),
            );
        }
        Scenario::CheckoutNumericMessage => {
            return with_stub_header(
                StatusCode::OK,
                Json(json!({ "transaction": STUB_TRANSACTION, "message": 42 })),
            );
        }
        _ => {}
    }

    with_stub_header(
        StatusCode::OK,
        Json(json!({
            "transaction": STUB_TRANSACTION,
            "message": format!(
                "Checkout ready: {qty} x {} ({} SOL) to shop wallet",
                item.name,
                amount.display_sol()
            )
        })),
    )
}
