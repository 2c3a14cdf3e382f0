//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `BLINK_BASE_URL` - Blink server base URL (default: `http://127.0.0.1:3000`)
//! - `BLINK_ACCOUNT` - Payer public key (default: the system program address)
//! - `BLINK_SKU` - Initially selected catalog item (default: `coffee`)
//! - `BLINK_QTY` - Initial quantity, clamped to 1-20 (default: 1)
//! - `BLINK_SKIP_BALANCE_CHECK` - Demo mode flag (default: true)
//! - `BLINK_USER_AGENT` - User-Agent sent with every request

use blink_checkout_core::session::{DEFAULT_ACCOUNT, DEFAULT_BASE_URL};
use blink_checkout_core::{CheckoutSession, Quantity, ShopItem, catalog};
use thiserror::Error;
use url::Url;

/// User-Agent sent when `BLINK_USER_AGENT` is not set.
pub const DEFAULT_USER_AGENT: &str = concat!("blink-checkout/", env!("CARGO_PKG_VERSION"));

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Blink client configuration.
#[derive(Debug, Clone)]
pub struct BlinkConfig {
    /// Blink server base URL, without a trailing slash
    pub base_url: String,
    /// Payer public key
    pub account: String,
    /// Initially selected catalog item
    pub item: &'static ShopItem,
    /// Initial quantity
    pub quantity: Quantity,
    /// Ask the server to skip its balance check
    pub skip_balance_check: bool,
    /// User-Agent header value
    pub user_agent: String,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            account: DEFAULT_ACCOUNT.to_string(),
            item: catalog::default_item(),
            quantity: Quantity::default(),
            skip_balance_check: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BlinkConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let base_url = get_or_default("BLINK_BASE_URL", DEFAULT_BASE_URL);
        let base_url = validate_base_url(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("BLINK_BASE_URL".to_string(), e))?;

        let item = catalog::lookup(&get_or_default("BLINK_SKU", "coffee"))
            .map_err(|e| ConfigError::InvalidEnvVar("BLINK_SKU".to_string(), e.to_string()))?;

        let skip_balance_check = parse_bool(&get_or_default("BLINK_SKIP_BALANCE_CHECK", "true"))
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "BLINK_SKIP_BALANCE_CHECK".to_string(),
                    "expected true or false".to_string(),
                )
            })?;

        Ok(Self {
            base_url,
            account: get_or_default("BLINK_ACCOUNT", DEFAULT_ACCOUNT)
                .trim()
                .to_string(),
            item,
            quantity: Quantity::from_input(&get_or_default("BLINK_QTY", "1")),
            skip_balance_check,
            user_agent: get_or_default("BLINK_USER_AGENT", DEFAULT_USER_AGENT),
        })
    }

    /// Build the initial checkout session from this configuration.
    #[must_use]
    pub fn to_session(&self) -> CheckoutSession {
        let mut session = CheckoutSession::default();
        session.set_base_url(&self.base_url);
        session.set_account(&self.account);
        session.select(self.item);
        session.set_quantity(self.quantity);
        session.set_skip_balance_check(self.skip_balance_check);
        session
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Check that `raw` is an absolute `http`/`https` URL and normalize it.
///
/// # Errors
///
/// Returns a description of the problem if the URL is unusable.
pub fn validate_base_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(format!("unsupported scheme `{other}`")),
    }
}

/// Parse a boolean flag.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
