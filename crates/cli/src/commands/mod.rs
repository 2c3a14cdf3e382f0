//! Subcommand implementations.

pub mod actions;
pub mod checkout;
pub mod shop;

use blink_checkout_client::config::validate_base_url;
use blink_checkout_client::{BlinkConfig, BlinkError, ConfigError};
use blink_checkout_core::{CatalogError, CheckoutSession};
use clap::Args;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The requested SKU is not in the catalog.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// `--base-url` is not a usable URL.
    #[error("Invalid --base-url: {0}")]
    InvalidBaseUrl(String),

    /// A Blink server call failed.
    #[error(transparent)]
    Blink(#[from] BlinkError),

    /// A Blink server answered with an unexpected shape.
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Writing output failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Options selecting what to buy and from where.
///
/// Each option overrides the matching `BLINK_*` environment variable.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    /// Catalog item to buy (coffee, sticker, hoodie)
    #[arg(short, long)]
    pub sku: Option<String>,

    /// Quantity, clamped to 1-20
    #[arg(short, long, allow_hyphen_values = true)]
    pub qty: Option<String>,

    /// Payer public key
    #[arg(short, long)]
    pub account: Option<String>,

    /// Blink server base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Let the server check the payer's balance (turns demo mode off)
    #[arg(long)]
    pub live: bool,
}

impl SelectionArgs {
    /// Apply these options on top of the configured session.
    ///
    /// # Errors
    ///
    /// Returns error if the SKU is unknown or the base URL is invalid.
    pub fn apply(&self, session: &mut CheckoutSession) -> Result<(), CommandError> {
        if let Some(sku) = &self.sku {
            session.select_sku(sku)?;
        }
        if let Some(qty) = &self.qty {
            session.set_quantity_input(qty);
        }
        if let Some(account) = &self.account {
            session.set_account(account);
        }
        if let Some(base_url) = &self.base_url {
            let base_url = validate_base_url(base_url).map_err(CommandError::InvalidBaseUrl)?;
            session.set_base_url(&base_url);
        }
        if self.live {
            session.set_skip_balance_check(false);
        }
        Ok(())
    }
}

/// Load the environment configuration and the session the options describe.
///
/// # Errors
///
/// Returns error if the environment or the options are invalid.
pub fn load_session(args: &SelectionArgs) -> Result<(BlinkConfig, CheckoutSession), CommandError> {
    let config = BlinkConfig::from_env()?;
    let mut session = config.to_session();
    args.apply(&mut session)?;
    Ok((config, session))
}
