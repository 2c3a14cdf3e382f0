//! Wire types of the Solana Action (Blink) endpoints.
//!
//! A Blink server exposes three documents the checkout flow cares about:
//!
//! - `GET /actions.json` - [`ActionsJson`], mapping site paths to action APIs
//! - `GET /api/actions/checkout` - [`ActionGetResponse`], display metadata
//! - `POST /api/actions/checkout` - takes an [`ActionPostRequest`] and returns
//!   an [`ActionPostResponse`] carrying an unsigned, base64 transaction
//!
//! The server is an external collaborator. These types accept what it sends
//! and tolerate fields they do not know about.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// The `actions.json` manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionsJson {
    /// Path mapping rules, tried in order.
    pub rules: Vec<ActionRule>,
}

/// One `actions.json` rule mapping site paths to an action API path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRule {
    /// Site path pattern, e.g. `/shop/*`.
    pub path_pattern: String,
    /// API path serving matching paths, e.g. `/api/actions/checkout`.
    pub api_path: String,
}

impl ActionsJson {
    /// Map a site path to the action API path of the first matching rule.
    ///
    /// In a pattern, `*` matches exactly one path segment and a trailing
    /// `**` matches any remainder. A trailing `/*` also matches the bare
    /// prefix, so `/shop/*` matches `/shop`. Query strings are ignored.
    ///
    /// ```
    /// use blink_checkout_core::{ActionRule, ActionsJson};
    ///
    /// let manifest = ActionsJson {
    ///     rules: vec![
    ///         ActionRule {
    ///             path_pattern: "/shop/*".into(),
    ///             api_path: "/api/actions/checkout".into(),
    ///         },
    ///         ActionRule {
    ///             path_pattern: "/**".into(),
    ///             api_path: "/api/actions/tip".into(),
    ///         },
    ///     ],
    /// };
    ///
    /// assert_eq!(manifest.resolve("/shop/coffee"), Some("/api/actions/checkout"));
    /// assert_eq!(manifest.resolve("/about/team"), Some("/api/actions/tip"));
    /// ```
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let path = path.split('?').next().unwrap_or_default();
        let segments = split_segments(path);
        self.rules
            .iter()
            .find(|rule| pattern_matches(&split_segments(&rule.path_pattern), &segments))
            .map(|rule| rule.api_path.as_str())
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn pattern_matches(pattern: &[&str], path: &[&str]) -> bool {
    match (pattern.split_first(), path.split_first()) {
        (None, None) => true,
        (Some((&"**", rest)), _) if rest.is_empty() => true,
        (Some((&"*", rest)), None) => rest.is_empty(),
        (Some((expected, pattern_rest)), Some((segment, path_rest))) => {
            (*expected == "*" || expected == segment) && pattern_matches(pattern_rest, path_rest)
        }
        _ => false,
    }
}

/// Metadata returned by `GET` on an action endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionGetResponse {
    /// Action type, normally `action`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<String>,
    /// Icon URL.
    pub icon: String,
    /// Title shown on the action card.
    pub title: String,
    /// Longer description.
    pub description: String,
    /// Default button label.
    pub label: String,
    /// Parameterized sub-actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
}

impl ActionGetResponse {
    /// The linked actions, or an empty slice when there are none.
    #[must_use]
    pub fn linked_actions(&self) -> &[LinkedAction] {
        self.links
            .as_ref()
            .map(|links| links.actions.as_slice())
            .unwrap_or_default()
    }
}

/// Container for linked actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

/// A linked action whose `href` may contain `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAction {
    /// Target URL template, e.g. `/api/actions/checkout?sku={sku}&qty={qty}`.
    pub href: String,
    /// Button label.
    pub label: String,
    /// Inputs that fill the `href` placeholders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<ActionParameter>>,
}

impl LinkedAction {
    /// Fill `{name}` placeholders in `href` with form-urlencoded values.
    ///
    /// Placeholders without a value are left in place.
    #[must_use]
    pub fn expand_href(&self, values: &[(&str, &str)]) -> String {
        values.iter().fold(self.href.clone(), |href, (name, value)| {
            let encoded: String = url::form_urlencoded::byte_serialize(value.as_bytes()).collect();
            href.replace(&format!("{{{name}}}"), &encoded)
        })
    }

    /// The parameters, or an empty slice when there are none.
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        self.parameters.as_deref().unwrap_or_default()
    }
}

/// A user input declared by a linked action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionParameter {
    /// Placeholder name in the linked action's `href`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<ActionParameterType>,
    /// Minimum value for number inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
}

/// Input type of an [`ActionParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionParameterType {
    Text,
    Number,
    /// Any input type this client does not render specially.
    #[serde(other)]
    Other,
}

/// Body of `POST` on an action endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPostRequest {
    /// Payer public key (base58).
    pub account: String,
}

/// Response of `POST` on an action endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPostResponse {
    /// Unsigned transaction, base64 encoded.
    pub transaction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ActionPostResponse {
    /// Size of the decoded transaction in bytes.
    ///
    /// Returns `None` if `transaction` is not valid base64.
    #[must_use]
    pub fn transaction_bytes(&self) -> Option<usize> {
        decoded_len(&self.transaction)
    }
}

/// Length of a base64 payload once decoded, or `None` if it is not base64.
#[must_use]
pub fn decoded_len(base64: &str) -> Option<usize> {
    STANDARD.decode(base64).ok().map(|bytes| bytes.len())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn manifest() -> ActionsJson {
        serde_json::from_value(serde_json::json!({
            "rules": [
                { "pathPattern": "/shop/*", "apiPath": "/api/actions/checkout" },
                { "pathPattern": "/docs/**", "apiPath": "/api/actions/docs" },
                { "pathPattern": "/*", "apiPath": "/api/actions/tip" }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_manifest_wire_names() {
        let manifest = manifest();
        assert_eq!(manifest.rules.len(), 3);
        assert_eq!(manifest.rules[0].path_pattern, "/shop/*");
        let json = serde_json::to_value(&manifest).unwrap();
        assert_eq!(json["rules"][0]["apiPath"], "/api/actions/checkout");
    }

    #[test]
    fn test_resolve_single_segment_wildcard() {
        let manifest = manifest();
        assert_eq!(manifest.resolve("/shop/coffee"), Some("/api/actions/checkout"));
        assert_eq!(manifest.resolve("/shop"), Some("/api/actions/checkout"));
        assert_eq!(
            manifest.resolve("/shop/coffee?ref=x"),
            Some("/api/actions/checkout")
        );
    }

    #[test]
    fn test_resolve_falls_through_in_order() {
        let manifest = manifest();
        assert_eq!(manifest.resolve("/about"), Some("/api/actions/tip"));
        assert_eq!(manifest.resolve("/"), Some("/api/actions/tip"));
        assert_eq!(manifest.resolve("/shop/coffee/large"), None);
    }

    #[test]
    fn test_resolve_recursive_wildcard() {
        let manifest = manifest();
        assert_eq!(manifest.resolve("/docs"), Some("/api/actions/docs"));
        assert_eq!(manifest.resolve("/docs/a/b/c"), Some("/api/actions/docs"));
    }

    #[test]
    fn test_resolve_empty_manifest() {
        let manifest = ActionsJson { rules: vec![] };
        assert_eq!(manifest.resolve("/shop/coffee"), None);
    }

    #[test]
    fn test_metadata_parses_checkout_shape() {
        let metadata: ActionGetResponse = serde_json::from_value(serde_json::json!({
            "icon": "https://example.com/logo.svg",
            "title": "Blink Shop Checkout",
            "description": "Pick an item and quantity to generate a checkout transaction.",
            "label": "Checkout",
            "links": { "actions": [{
                "href": "/api/actions/checkout?sku={sku}&qty={qty}",
                "label": "Pay Shop",
                "parameters": [
                    { "name": "sku", "label": "Item sku", "required": true, "type": "text" },
                    { "name": "qty", "label": "Quantity", "required": true, "type": "number", "min": 1.0 },
                    { "name": "note", "type": "textarea" }
                ]
            }]}
        }))
        .unwrap();

        assert!(metadata.action_type.is_none());
        let action = &metadata.linked_actions()[0];
        assert_eq!(action.parameters().len(), 3);
        assert_eq!(
            action.parameters()[1].parameter_type,
            Some(ActionParameterType::Number)
        );
        assert_eq!(action.parameters()[1].min, Some(1.0));
        assert_eq!(
            action.parameters()[2].parameter_type,
            Some(ActionParameterType::Other)
        );
    }

    #[test]
    fn test_metadata_without_links() {
        let metadata: ActionGetResponse = serde_json::from_str(
            r#"{"type":"action","icon":"i","title":"t","description":"d","label":"l"}"#,
        )
        .unwrap();
        assert_eq!(metadata.action_type.as_deref(), Some("action"));
        assert!(metadata.linked_actions().is_empty());
    }

    #[test]
    fn test_expand_href() {
        let action = LinkedAction {
            href: "/api/actions/checkout?sku={sku}&qty={qty}".to_string(),
            label: "Pay Shop".to_string(),
            parameters: None,
        };
        assert_eq!(
            action.expand_href(&[("sku", "hoodie"), ("qty", "2")]),
            "/api/actions/checkout?sku=hoodie&qty=2"
        );
        assert_eq!(
            action.expand_href(&[("sku", "a b&c")]),
            "/api/actions/checkout?sku=a+b%26c&qty={qty}"
        );
        assert!(action.parameters().is_empty());
    }

    #[test]
    fn test_post_request_body() {
        let body = ActionPostRequest {
            account: "11111111111111111111111111111111".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"account":"11111111111111111111111111111111"}"#
        );
    }

    #[test]
    fn test_transaction_bytes() {
        let response: ActionPostResponse =
            serde_json::from_str(r#"{"transaction":"AQIDBA==","message":"ok"}"#).unwrap();
        assert_eq!(response.transaction_bytes(), Some(4));
        assert_eq!(response.message.as_deref(), Some("ok"));

        let garbage = ActionPostResponse {
            transaction: "not base64!".to_string(),
            message: None,
        };
        assert_eq!(garbage.transaction_bytes(), None);
    }
}
