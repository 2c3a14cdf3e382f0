//! Blink Checkout Core - Shared types library.
//!
//! This crate provides the types used by every Blink checkout component:
//! - `client` - HTTP client for the Solana Action (Blink) endpoints
//! - `cli` - The `blink-shop` terminal front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O and no
//! HTTP clients. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Catalog entries, quantities, and lamport-denominated prices
//! - [`action`] - Wire types of the Blink endpoints
//! - [`session`] - Checkout session state and the URLs derived from it
//! - [`trace`] - Request/response traces shown as technical details

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod action;
pub mod session;
pub mod trace;
pub mod types;

pub use action::*;
pub use session::CheckoutSession;
pub use trace::*;
pub use types::*;
