//! Text rendering for the terminal shop.
//!
//! Everything is written to a caller-supplied [`Write`] so the output can be
//! asserted on in tests and stdout stays free of log lines.

use std::io::{self, Write};

use blink_checkout_client::checkout::NOT_LOADED;
use blink_checkout_client::{CheckoutReport, ResponsePanels};
use blink_checkout_core::{
    ActionGetResponse, ActionsJson, CATALOG, CheckoutSession, NETWORK_FEE, ShopItem,
};

/// Merchant shown at the top of the payment sheet.
pub const MERCHANT: &str = "Orbitflare Shop";

/// Closing hint printed after a checkout.
pub const SIGNING_HINT: &str = "For real wallet signing and send, connect Phantom/Backpack next and submit `transaction` via `sendTransaction`.";

const LABEL_WIDTH: usize = 14;

/// List the catalog, marking the selected item.
///
/// # Errors
///
/// Returns error if writing fails.
pub fn catalog(out: &mut impl Write, selected: &ShopItem) -> io::Result<()> {
    writeln!(out, "Items")?;
    for item in CATALOG {
        let marker = if item.sku == selected.sku { '*' } else { ' ' };
        writeln!(
            out,
            "{marker} {:<8} {:<20} {:>8} SOL  {}",
            item.sku,
            item.name,
            item.price.display_sol(),
            item.description
        )?;
    }
    Ok(())
}

/// Render the payment sheet for the current selection.
///
/// # Errors
///
/// Returns error if writing fails.
pub fn sheet(out: &mut impl Write, session: &CheckoutSession) -> io::Result<()> {
    let item = session.selected();
    let summary = session.summary();

    writeln!(out, "Blink Checkout - Pay Merchant")?;
    writeln!(out)?;
    writeln!(out, "{MERCHANT}")?;
    writeln!(
        out,
        "  {}  ({} SOL each)",
        item.name,
        item.price.display_sol()
    )?;
    writeln!(out, "  {}", item.description)?;
    writeln!(out)?;
    line(out, "Quantity", &summary.quantity.to_string())?;
    line(
        out,
        "Subtotal",
        &format!("{} SOL", summary.subtotal.display_sol_fixed()),
    )?;
    line(
        out,
        "Network fee",
        &format!("~{} SOL", NETWORK_FEE.display_sol_fixed()),
    )?;
    line(
        out,
        "Total",
        &format!("{} SOL", summary.total.display_sol_fixed()),
    )?;
    writeln!(out)?;
    line(out, "Shopper", session.account())?;
    line(
        out,
        "Demo mode",
        if session.skip_balance_check() {
            "on (skip balance check)"
        } else {
            "off"
        },
    )?;
    writeln!(out)?;
    writeln!(out, "[ {} ]", summary.pay_label())?;
    writeln!(out, "Checkout URL: {}", session.checkout_url())
}

/// Render the outcome of a checkout, with technical details if requested.
///
/// # Errors
///
/// Returns error if writing fails.
pub fn report(
    out: &mut impl Write,
    session: &CheckoutSession,
    report: &CheckoutReport,
    show_debug: bool,
) -> io::Result<()> {
    if let Some(message) = &report.message {
        writeln!(out, "ok: {message}")?;
    }
    if let Some(error) = &report.error {
        writeln!(out, "error: {error}")?;
    }

    if show_debug {
        writeln!(out)?;
        technical_details(out, session, report)?;
    }

    writeln!(out)?;
    writeln!(out, "{SIGNING_HINT}")
}

fn technical_details(
    out: &mut impl Write,
    session: &CheckoutSession,
    report: &CheckoutReport,
) -> io::Result<()> {
    let ResponsePanels {
        manifest,
        metadata,
        checkout,
    } = &report.panels;

    panel(out, "actions.json", manifest.as_deref())?;
    panel(out, "GET /api/actions/checkout", metadata.as_deref())?;
    panel(out, "POST /api/actions/checkout", checkout.as_deref())?;
    panel(out, "Checkout URL", Some(&report.checkout_url))?;
    panel(
        out,
        "Request/Response Trace",
        Some(&report.debug_trace_pretty()),
    )?;
    panel(out, "API base URL", Some(session.base_url()))
}

/// Render the manifest rules and the checkout action's links.
///
/// Links are shown with their `{placeholders}` filled from the session.
///
/// # Errors
///
/// Returns error if writing fails.
pub fn actions(
    out: &mut impl Write,
    session: &CheckoutSession,
    manifest: &ActionsJson,
    metadata: &ActionGetResponse,
) -> io::Result<()> {
    writeln!(out, "actions.json rules")?;
    if manifest.rules.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for rule in &manifest.rules {
        writeln!(out, "  {} -> {}", rule.path_pattern, rule.api_path)?;
    }
    let shop_path = format!("/shop/{}", session.selected().sku);
    writeln!(
        out,
        "  {shop_path} resolves to {}",
        manifest.resolve(&shop_path).unwrap_or("(no matching rule)")
    )?;

    writeln!(out)?;
    writeln!(out, "{} - {}", metadata.title, metadata.label)?;
    writeln!(out, "  {}", metadata.description)?;

    let qty = session.quantity().to_string();
    let values = [("sku", session.selected().sku), ("qty", qty.as_str())];
    for action in metadata.linked_actions() {
        writeln!(out, "  [{}] {}", action.label, action.expand_href(&values))?;
        for param in action.parameters() {
            let required = if param.required.unwrap_or(false) {
                " (required)"
            } else {
                ""
            };
            writeln!(
                out,
                "      {}: {}{required}",
                param.name,
                param.label.as_deref().unwrap_or(&param.name)
            )?;
        }
    }
    Ok(())
}

fn line(out: &mut impl Write, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {label:<LABEL_WIDTH$}{value}")
}

fn panel(out: &mut impl Write, title: &str, body: Option<&str>) -> io::Result<()> {
    writeln!(out, "== {title} ==")?;
    writeln!(out, "{}", body.unwrap_or(NOT_LOADED))?;
    writeln!(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use blink_checkout_core::{DebugTrace, catalog};

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn failed(session: &CheckoutSession) -> CheckoutReport {
        CheckoutReport {
            checkout_url: session.checkout_url(),
            panels: ResponsePanels {
                manifest: Some("{}".to_string()),
                metadata: None,
                checkout: None,
            },
            message: None,
            error: Some("Insufficient balance".to_string()),
            transaction: None,
            debug_trace: DebugTrace::Failure {
                error: "Insufficient balance".to_string(),
                checkout_url: session.checkout_url(),
                failed_call: None,
            },
        }
    }

    #[test]
    fn test_catalog_marks_selection() {
        let out = render(|buf| catalog(buf, catalog::find("sticker").unwrap()));
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("  coffee"));
        assert!(lines[2].starts_with("* sticker"));
        assert!(lines[3].contains("0.08 SOL"));
    }

    #[test]
    fn test_sheet_totals() {
        let mut session = CheckoutSession::default();
        session.select_sku("hoodie").unwrap();
        session.set_quantity_input("2");
        let out = render(|buf| sheet(buf, &session));

        assert!(out.contains(MERCHANT));
        assert!(out.contains("Validator Hoodie  (0.08 SOL each)"));
        assert!(out.contains("Subtotal      0.160000 SOL"));
        assert!(out.contains("Network fee   ~0.000005 SOL"));
        assert!(out.contains("Total         0.160005 SOL"));
        assert!(out.contains("[ Pay 0.160005 SOL ]"));
        assert!(out.contains("on (skip balance check)"));
        assert!(out.contains("?sku=hoodie&qty=2&skip_balance_check=true"));
    }

    #[test]
    fn test_report_without_debug() {
        let session = CheckoutSession::default();
        let out = render(|buf| report(buf, &session, &failed(&session), false));
        assert!(out.starts_with("error: Insufficient balance\n"));
        assert!(!out.contains("== actions.json =="));
        assert!(out.trim_end().ends_with(SIGNING_HINT));
    }

    #[test]
    fn test_report_with_debug_panels() {
        let session = CheckoutSession::default();
        let out = render(|buf| report(buf, &session, &failed(&session), true));

        assert!(out.contains("== actions.json ==\n{}\n"));
        assert!(out.contains("== GET /api/actions/checkout ==\n(not loaded)\n"));
        assert!(out.contains("== POST /api/actions/checkout ==\n(not loaded)\n"));
        assert!(out.contains("== Checkout URL ==\nhttp://127.0.0.1:3000/api/actions/checkout"));
        assert!(out.contains("\"error\": \"Insufficient balance\""));
        assert!(out.contains("== API base URL ==\nhttp://127.0.0.1:3000\n"));
    }

    #[test]
    fn test_actions_listing() {
        let manifest: ActionsJson = serde_json::from_value(serde_json::json!({
            "rules": [{ "pathPattern": "/shop/*", "apiPath": "/api/actions/checkout" }]
        }))
        .unwrap();
        let metadata: ActionGetResponse = serde_json::from_value(serde_json::json!({
            "icon": "i",
            "title": "Blink Shop Checkout",
            "description": "Pick an item",
            "label": "Checkout",
            "links": { "actions": [{
                "href": "/api/actions/checkout?sku={sku}&qty={qty}",
                "label": "Pay Shop",
                "parameters": [{ "name": "qty", "label": "Quantity", "required": true }]
            }]}
        }))
        .unwrap();

        let mut session = CheckoutSession::default();
        session.set_quantity_input("3");
        let out = render(|buf| actions(buf, &session, &manifest, &metadata));

        assert!(out.contains("/shop/* -> /api/actions/checkout"));
        assert!(out.contains("/shop/coffee resolves to /api/actions/checkout"));
        assert!(out.contains("[Pay Shop] /api/actions/checkout?sku=coffee&qty=3"));
        assert!(out.contains("qty: Quantity (required)"));
    }
}
