//! Checkout session state.
//!
//! A [`CheckoutSession`] is everything the shopper has chosen so far: which
//! Blink server to talk to, who pays, what they are buying and how many, and
//! whether the server should skip its balance check. The totals and the
//! request URLs are derived from it on demand.

use crate::action::ActionPostRequest;
use crate::types::catalog::{self, CatalogError, ShopItem};
use crate::types::price::PaymentSummary;
use crate::types::quantity::Quantity;

/// Blink server used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";

/// Payer used when none is configured (the system program address).
pub const DEFAULT_ACCOUNT: &str = "11111111111111111111111111111111";

/// Path of the action manifest.
pub const MANIFEST_PATH: &str = "/actions.json";

/// Path of the checkout action.
pub const CHECKOUT_PATH: &str = "/api/actions/checkout";

/// The shopper's current choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    base_url: String,
    account: String,
    selected: &'static ShopItem,
    quantity: Quantity,
    skip_balance_check: bool,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account: DEFAULT_ACCOUNT.to_string(),
            selected: catalog::default_item(),
            quantity: Quantity::default(),
            skip_balance_check: true,
        }
    }
}

impl CheckoutSession {
    /// Blink server base URL, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Payer public key.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// The selected catalog entry.
    #[must_use]
    pub const fn selected(&self) -> &'static ShopItem {
        self.selected
    }

    #[must_use]
    pub const fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Whether the demo flag asks the server to skip its balance check.
    #[must_use]
    pub const fn skip_balance_check(&self) -> bool {
        self.skip_balance_check
    }

    /// Set the Blink server, trimming whitespace and trailing slashes.
    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
    }

    /// Set the payer, trimming whitespace.
    pub fn set_account(&mut self, account: &str) {
        self.account = account.trim().to_string();
    }

    /// Select a catalog entry by SKU.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownSku`] and keeps the current selection
    /// if the SKU is not in the catalog.
    pub fn select_sku(&mut self, sku: &str) -> Result<(), CatalogError> {
        self.select(catalog::lookup(sku)?);
        Ok(())
    }

    /// Select a catalog entry already looked up.
    pub const fn select(&mut self, item: &'static ShopItem) {
        self.selected = item;
    }

    pub const fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    /// Set the quantity from free-form input, clamping it into range.
    pub fn set_quantity_input(&mut self, input: &str) {
        self.quantity = Quantity::from_input(input);
    }

    pub const fn set_skip_balance_check(&mut self, skip: bool) {
        self.skip_balance_check = skip;
    }

    /// Totals for the current selection.
    #[must_use]
    pub fn summary(&self) -> PaymentSummary {
        PaymentSummary::new(self.selected, self.quantity)
    }

    /// URL of the action manifest.
    #[must_use]
    pub fn manifest_url(&self) -> String {
        format!("{}{MANIFEST_PATH}", self.base_url)
    }

    /// URL of the checkout metadata.
    #[must_use]
    pub fn metadata_url(&self) -> String {
        format!("{}{CHECKOUT_PATH}", self.base_url)
    }

    /// URL the checkout request is posted to.
    ///
    /// ```
    /// use blink_checkout_core::CheckoutSession;
    ///
    /// let mut session = CheckoutSession::default();
    /// assert_eq!(
    ///     session.checkout_url(),
    ///     "http://127.0.0.1:3000/api/actions/checkout?sku=coffee&qty=1&skip_balance_check=true"
    /// );
    ///
    /// session.set_skip_balance_check(false);
    /// assert_eq!(
    ///     session.checkout_url(),
    ///     "http://127.0.0.1:3000/api/actions/checkout?sku=coffee&qty=1"
    /// );
    /// ```
    #[must_use]
    pub fn checkout_url(&self) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("sku", self.selected.sku)
            .append_pair("qty", &self.quantity.to_string());
        if self.skip_balance_check {
            query.append_pair("skip_balance_check", "true");
        }
        format!("{}?{}", self.metadata_url(), query.finish())
    }

    /// Body of the checkout request.
    #[must_use]
    pub fn post_request(&self) -> ActionPostRequest {
        ActionPostRequest {
            account: self.account.clone(),
        }
    }
}
