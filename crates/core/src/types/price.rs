//! SOL amounts and the payment sheet arithmetic.
//!
//! Amounts are held as whole lamports so that multiplying by a quantity and
//! adding the network fee is exact. Conversion to SOL goes through
//! [`Decimal`] only for display.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::ShopItem;
use super::quantity::Quantity;

/// Number of lamports in one SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Decimal places of a lamport amount expressed in SOL.
const SOL_SCALE: u32 = 9;

/// Decimal places shown on the payment sheet.
const DISPLAY_DP: u32 = 6;

/// Estimated fee for a single-signature transfer.
pub const NETWORK_FEE: Lamports = Lamports::new(5_000);

/// An amount of SOL, counted in lamports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Lamports(u64);

impl Lamports {
    /// Zero lamports.
    pub const ZERO: Self = Self(0);

    /// Create an amount from a lamport count.
    #[must_use]
    pub const fn new(lamports: u64) -> Self {
        Self(lamports)
    }

    /// Get the lamport count.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Multiply by a quantity, saturating at `u64::MAX` lamports.
    #[must_use]
    pub const fn saturating_mul(self, qty: u64) -> Self {
        Self(self.0.saturating_mul(qty))
    }

    /// Add another amount, saturating at `u64::MAX` lamports.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// The exact amount in SOL.
    #[must_use]
    pub fn to_sol(self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), SOL_SCALE)
    }

    /// SOL amount without trailing zeros (e.g. `0.015`).
    #[must_use]
    pub fn display_sol(self) -> String {
        self.to_sol().normalize().to_string()
    }

    /// SOL amount with six decimal places (e.g. `0.015000`).
    #[must_use]
    pub fn display_sol_fixed(self) -> String {
        format!("{:.6}", self.to_sol().round_dp(DISPLAY_DP))
    }
}

impl fmt::Display for Lamports {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} SOL", self.display_sol())
    }
}

impl From<u64> for Lamports {
    fn from(lamports: u64) -> Self {
        Self(lamports)
    }
}

impl From<Lamports> for u64 {
    fn from(amount: Lamports) -> Self {
        amount.0
    }
}

/// Totals shown on the payment sheet for one line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentSummary {
    /// Unit price of the selected item.
    pub unit_price: Lamports,
    /// Quantity ordered.
    pub quantity: Quantity,
    /// Unit price times quantity.
    pub subtotal: Lamports,
    /// Estimated network fee.
    pub network_fee: Lamports,
    /// Subtotal plus network fee.
    pub total: Lamports,
}

impl PaymentSummary {
    /// Compute the totals for `quantity` units of `item`.
    #[must_use]
    pub fn new(item: &ShopItem, quantity: Quantity) -> Self {
        let subtotal = item.price.saturating_mul(u64::from(quantity.get()));
        Self {
            unit_price: item.price,
            quantity,
            subtotal,
            network_fee: NETWORK_FEE,
            total: subtotal.saturating_add(NETWORK_FEE),
        }
    }

    /// Label for the pay button, e.g. `Pay 0.015005 SOL`.
    #[must_use]
    pub fn pay_label(&self) -> String {
        format!("Pay {} SOL", self.total.display_sol_fixed())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_to_sol_is_exact() {
        assert_eq!(Lamports::new(LAMPORTS_PER_SOL).to_sol(), Decimal::ONE);
        assert_eq!(Lamports::new(1).to_sol(), Decimal::new(1, 9));
    }

    #[test]
    fn test_display_sol() {
        assert_eq!(Lamports::new(15_000_000).display_sol(), "0.015");
        assert_eq!(Lamports::ZERO.display_sol(), "0");
        assert_eq!(Lamports::new(2 * LAMPORTS_PER_SOL).display_sol(), "2");
    }

    #[test]
    fn test_display_sol_fixed() {
        assert_eq!(Lamports::new(15_000_000).display_sol_fixed(), "0.015000");
        assert_eq!(NETWORK_FEE.display_sol_fixed(), "0.000005");
        assert_eq!(Lamports::ZERO.display_sol_fixed(), "0.000000");
    }

    #[test]
    fn test_display() {
        assert_eq!(Lamports::new(80_000_000).to_string(), "0.08 SOL");
    }

    #[test]
    fn test_saturating_arithmetic() {
        assert_eq!(
            Lamports::new(u64::MAX).saturating_mul(2),
            Lamports::new(u64::MAX)
        );
        assert_eq!(
            Lamports::new(u64::MAX).saturating_add(NETWORK_FEE),
            Lamports::new(u64::MAX)
        );
    }

    #[test]
    fn test_summary_coffee_times_three() {
        let coffee = catalog::find("coffee").unwrap();
        let summary = PaymentSummary::new(coffee, Quantity::new(3).unwrap());
        assert_eq!(summary.subtotal.display_sol_fixed(), "0.045000");
        assert_eq!(summary.network_fee, NETWORK_FEE);
        assert_eq!(summary.total.display_sol_fixed(), "0.045005");
        assert_eq!(summary.pay_label(), "Pay 0.045005 SOL");
    }

    #[test]
    fn test_summary_max_hoodies() {
        let hoodie = catalog::find("hoodie").unwrap();
        let summary = PaymentSummary::new(hoodie, Quantity::MAX);
        assert_eq!(summary.subtotal.display_sol_fixed(), "1.600000");
        assert_eq!(summary.total.display_sol_fixed(), "1.600005");
    }

    #[test]
    fn test_summary_single_sticker() {
        let sticker = catalog::find("sticker").unwrap();
        let summary = PaymentSummary::new(sticker, Quantity::MIN);
        assert_eq!(summary.unit_price, sticker.price);
        assert_eq!(summary.subtotal, sticker.price);
        assert_eq!(summary.total.as_u64(), 6_005_000);
    }
}
