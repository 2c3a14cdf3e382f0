//! Run the checkout against a Blink server.
//!
//! # Usage
//!
//! ```bash
//! # Pay for one coffee in demo mode
//! blink-shop checkout
//!
//! # Two hoodies, real balance check, with the technical details panel
//! blink-shop checkout --sku hoodie --qty 2 --account <PUBKEY> --live --debug
//! ```

use std::io::Write;
use std::process::ExitCode;

use blink_checkout_client::{BlinkClient, CheckoutReport, run_checkout};
use tracing::info;

use super::{CommandError, SelectionArgs, load_session};
use crate::render;

/// Show the payment sheet, authorize, and print the outcome.
///
/// Exits with failure when the checkout did not produce a transaction.
///
/// # Errors
///
/// Returns error if the configuration is invalid, the HTTP client cannot be
/// built, or output fails. Server errors are part of the printed report.
pub async fn run(
    out: &mut impl Write,
    args: &SelectionArgs,
    show_debug: bool,
) -> Result<ExitCode, CommandError> {
    let (config, session) = load_session(args)?;
    let client = BlinkClient::new(&config)?;

    render::sheet(out, &session)?;
    writeln!(out)?;
    writeln!(out, "Authorizing...")?;
    out.flush()?;

    info!(base_url = %session.base_url(), "Starting checkout");
    let report = run_checkout(&client, &session).await;
    render::report(out, &session, &report, show_debug)?;

    Ok(exit_code(&report))
}

/// Process exit status for a finished checkout.
fn exit_code(report: &CheckoutReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use blink_checkout_client::ResponsePanels;
    use blink_checkout_core::{
        CallTrace, CheckoutCalls, DebugTrace, DerivedFacts, RequestTrace, ResponseTrace,
    };
    use serde_json::{Value, json};

    use super::*;

    fn closed_port_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}")
    }

    fn report(error: Option<&str>) -> CheckoutReport {
        let url = "http://x/api/actions/checkout?sku=coffee&qty=1".to_string();
        let debug_trace = match error {
            Some(error) => DebugTrace::Failure {
                error: error.to_string(),
                checkout_url: url.clone(),
                failed_call: None,
            },
            None => DebugTrace::Success {
                calls: Box::new(CheckoutCalls {
                    actions_json: call(),
                    checkout_metadata: call(),
                    checkout_post: call(),
                }),
                derived: DerivedFacts::new(&url, "AQID"),
            },
        };
        CheckoutReport {
            checkout_url: url,
            panels: ResponsePanels::default(),
            message: error.is_none().then(|| "ok".to_string()),
            error: error.map(str::to_string),
            transaction: error.is_none().then(|| "AQID".to_string()),
            debug_trace,
        }
    }

    fn call() -> CallTrace {
        CallTrace {
            request: RequestTrace {
                url: "u".to_string(),
                method: "GET".to_string(),
                body: Value::Null,
            },
            response: ResponseTrace {
                status: 200,
                ok: true,
                elapsed_ms: 0,
                headers: BTreeMap::new(),
                body: json!({}),
            },
        }
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(&report(None)), ExitCode::SUCCESS);
        assert_eq!(exit_code(&report(Some("Request failed: 500"))), ExitCode::FAILURE);
    }

    #[tokio::test]
    async fn test_run_fails_when_server_is_down() {
        let args = SelectionArgs {
            sku: Some("sticker".to_string()),
            base_url: Some(closed_port_url()),
            ..SelectionArgs::default()
        };
        let mut out = Vec::new();

        let code = run(&mut out, &args, true).await.unwrap();
        let out = String::from_utf8(out).unwrap();

        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.contains("Blink Sticker Pack"));
        assert!(out.contains("Authorizing..."));
        assert!(out.contains("error: HTTP error:"));
        assert!(!out.contains("ok: "));
        assert!(out.contains("== actions.json ==\n(not loaded)\n"));
        assert!(out.contains("\"checkoutUrl\""));
        assert!(out.trim_end().ends_with(render::SIGNING_HINT));
    }
}
