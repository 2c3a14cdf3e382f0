//! The shop catalog.
//!
//! The catalog is fixed at build time. Every selection made through a
//! [`CheckoutSession`](crate::CheckoutSession) resolves to one of these
//! entries, so there is no way to hold a selected item that is not for sale.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

use super::price::Lamports;

/// Errors that can occur when looking up a catalog entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No catalog entry has this SKU.
    #[error("unknown sku `{0}`. Use coffee, sticker, or hoodie")]
    UnknownSku(String),
}

/// A single item for sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopItem {
    /// Catalog identifier, also sent as the `sku` query parameter.
    pub sku: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Unit price.
    pub price: Lamports,
    /// Image path relative to the shop's static assets.
    pub image_url: &'static str,
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} SOL)", self.name, self.price.display_sol())
    }
}

const COFFEE: ShopItem = ShopItem {
    sku: "coffee",
    name: "Drift Coffee",
    description: "Single origin cup from the validator cafe",
    price: Lamports::new(15_000_000),
    image_url: "/images/coffee.svg",
};

const STICKER: ShopItem = ShopItem {
    sku: "sticker",
    name: "Blink Sticker Pack",
    description: "Three holo stickers for your laptop",
    price: Lamports::new(6_000_000),
    image_url: "/images/stickers-pack.svg",
};

const HOODIE: ShopItem = ShopItem {
    sku: "hoodie",
    name: "Validator Hoodie",
    description: "Heavyweight hoodie with node-map print",
    price: Lamports::new(80_000_000),
    image_url: "/images/hoodie-folded.svg",
};

/// Every item the shop sells, in display order.
pub const CATALOG: &[ShopItem] = &[COFFEE, STICKER, HOODIE];

/// The item selected when nothing else has been chosen.
#[must_use]
pub const fn default_item() -> &'static ShopItem {
    &COFFEE
}

/// Look up an item by its exact SKU.
#[must_use]
pub fn find(sku: &str) -> Option<&'static ShopItem> {
    CATALOG.iter().find(|item| item.sku == sku)
}

/// Look up an item by SKU, failing on an unknown SKU.
///
/// # Errors
///
/// Returns [`CatalogError::UnknownSku`] if no entry matches.
pub fn lookup(sku: &str) -> Result<&'static ShopItem, CatalogError> {
    find(sku).ok_or_else(|| CatalogError::UnknownSku(sku.to_string()))
}

/// Look up an item by SKU, falling back to the first catalog entry.
#[must_use]
pub fn select_or_default(sku: &str) -> &'static ShopItem {
    find(sku).unwrap_or(default_item())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_order() {
        let skus: Vec<_> = CATALOG.iter().map(|item| item.sku).collect();
        assert_eq!(skus, ["coffee", "sticker", "hoodie"]);
    }

    #[test]
    fn test_skus_are_unique() {
        for (i, item) in CATALOG.iter().enumerate() {
            assert!(
                CATALOG.iter().skip(i + 1).all(|other| other.sku != item.sku),
                "duplicate sku {}",
                item.sku
            );
        }
    }

    #[test]
    fn test_find() {
        assert_eq!(find("hoodie").unwrap().name, "Validator Hoodie");
        assert!(find("Hoodie").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_lookup_unknown() {
        let err = lookup("mug").unwrap_err();
        assert_eq!(err, CatalogError::UnknownSku("mug".to_string()));
        assert!(err.to_string().contains("coffee, sticker, or hoodie"));
    }

    #[test]
    fn test_select_or_default_falls_back_to_first() {
        assert_eq!(select_or_default("sticker").sku, "sticker");
        assert_eq!(select_or_default("nope").sku, "coffee");
        assert_eq!(default_item().sku, "coffee");
    }

    #[test]
    fn test_prices() {
        assert_eq!(find("coffee").unwrap().price.display_sol(), "0.015");
        assert_eq!(find("sticker").unwrap().price.display_sol(), "0.006");
        assert_eq!(find("hoodie").unwrap().price.display_sol(), "0.08");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            find("coffee").unwrap().to_string(),
            "Drift Coffee (0.015 SOL)"
        );
    }
}
