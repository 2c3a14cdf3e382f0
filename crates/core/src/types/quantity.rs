//! Line item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`] strictly.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuantityError {
    /// The value is outside the allowed range.
    #[error("quantity must be between {min} and {max} (got {value})")]
    OutOfRange {
        /// The rejected value.
        value: i64,
        /// Smallest allowed quantity.
        min: u8,
        /// Largest allowed quantity.
        max: u8,
    },
}

/// How many units of the selected item to buy.
///
/// ## Constraints
///
/// - Always between 1 and 20 inclusive
///
/// ## Examples
///
/// ```
/// use blink_checkout_core::Quantity;
///
/// assert_eq!(Quantity::clamped(0).get(), 1);
/// assert_eq!(Quantity::clamped(99).get(), 20);
/// assert_eq!(Quantity::from_input("").get(), 1);
/// assert_eq!(Quantity::from_input("7").get(), 7);
/// assert!(Quantity::new(21).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Quantity(u8);

impl Quantity {
    /// Smallest quantity that can be ordered.
    pub const MIN: Self = Self(1);
    /// Largest quantity that can be ordered.
    pub const MAX: Self = Self(20);

    /// Create a quantity, rejecting values outside `[1, 20]`.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::OutOfRange`] if `value` is 0 or above 20.
    pub fn new(value: u8) -> Result<Self, QuantityError> {
        Self::try_from(i64::from(value))
    }

    /// Create a quantity, clamping `value` into `[1, 20]`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN.0), i64::from(Self::MAX.0));
        // In range after the clamp above.
        Self(u8::try_from(clamped).unwrap_or(Self::MIN.0))
    }

    /// Interpret free-form input the way the quantity field does.
    ///
    /// Empty input means 1. Numbers are truncated toward zero and clamped.
    /// Anything that is not a number falls back to 1.
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::MIN;
        }

        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::clamped(value);
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_nan() => Self::MIN,
            #[allow(clippy::cast_possible_truncation)] // `as` saturates, then we clamp
            Ok(value) => Self::clamped(value.trunc() as i64),
            Err(_) => Self::MIN,
        }
    }

    /// Get the underlying value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < i64::from(Self::MIN.0) || value > i64::from(Self::MAX.0) {
            return Err(QuantityError::OutOfRange {
                value,
                min: Self::MIN.0,
                max: Self::MAX.0,
            });
        }
        Ok(Self::clamped(value))
    }
}

impl From<Quantity> for u8 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}
