//! Value types for the shop.
//!
//! This module provides type-safe wrappers for the catalog, quantities, and
//! SOL amounts.

pub mod catalog;
pub mod price;
pub mod quantity;

pub use catalog::{CATALOG, CatalogError, ShopItem};
pub use price::{LAMPORTS_PER_SOL, Lamports, NETWORK_FEE, PaymentSummary};
pub use quantity::{Quantity, QuantityError};
