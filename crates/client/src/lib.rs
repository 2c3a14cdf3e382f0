//! Blink Checkout Client - talks to Solana Action (Blink) servers.
//!
//! # Usage
//!
//! ```rust,no_run
//! use blink_checkout_client::{BlinkClient, BlinkConfig, run_checkout};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BlinkConfig::from_env()?;
//! let client = BlinkClient::new(&config)?;
//! let report = run_checkout(&client, &config.to_session()).await;
//!
//! match (&report.message, &report.error) {
//!     (Some(message), _) => println!("{message}"),
//!     (_, Some(error)) => eprintln!("{error}"),
//!     _ => {}
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration from environment variables
//! - [`client`] - The HTTP client and its request tracing
//! - [`checkout`] - The three-call checkout flow

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod checkout;
pub mod client;
pub mod config;

pub use checkout::{CheckoutReport, ResponsePanels, run_checkout};
pub use client::{BlinkClient, BlinkError, JsonCall};
pub use config::{BlinkConfig, ConfigError};
