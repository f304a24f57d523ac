//! # Quantity Module
//!
//! Fixed-point ingredient amounts.
//!
//! Ingredient stock and recipe requirements are decimal amounts ("12.5 g of
//! cocoa"). They follow the same rule as [`Money`](crate::Money): store an
//! integer count of the smallest unit, here thousandths, so that
//! `requirement × count` and the sums across recipes are exact.
//!
//! ```rust
//! use brew_core::Quantity;
//!
//! let shot = Quantity::parse("12.5").unwrap();
//! assert_eq!(shot.milli(), 12_500);
//! assert_eq!(shot.checked_mul(3).unwrap().to_string(), "37.5");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::fixed;

/// Number of decimal places in an amount.
const QUANTITY_SCALE: u32 = 3;

/// Thousandths per whole unit.
const MILLI_PER_UNIT: i64 = 1_000;

/// An ingredient amount in thousandths of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths of a unit.
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from whole units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Parses decimal text with at most three fractional digits.
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        fixed::parse_scaled(text, QUANTITY_SCALE)
            .map(Quantity)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a decimal amount with at most three decimals", text.trim()),
            })
    }

    /// Returns the raw thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a recipe count, `None` on overflow.
    #[inline]
    pub fn checked_mul(self, count: i64) -> Option<Quantity> {
        self.0.checked_mul(count).map(Quantity)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Quantity) -> Option<Quantity> {
        self.0.checked_add(other.0).map(Quantity)
    }

    /// Subtracts, returning `None` when the result would go below zero.
    ///
    /// Stock deductions go through this so a negative amount can never be
    /// produced.
    #[inline]
    pub fn checked_deduct(self, needed: Quantity) -> Option<Quantity> {
        self.0
            .checked_sub(needed.0)
            .filter(|remaining| *remaining >= 0)
            .map(Quantity)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&fixed::format_scaled(self.0, QUANTITY_SCALE, 0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::zero()
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_and_milli() {
        assert_eq!(Quantity::from_units(100).milli(), 100_000);
        assert_eq!(Quantity::from_milli(1_500).to_string(), "1.5");
        assert_eq!(Quantity::from_units(120).to_string(), "120");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Quantity::parse("100").unwrap(), Quantity::from_units(100));
        assert_eq!(Quantity::parse("0.125").unwrap(), Quantity::from_milli(125));
        assert!(Quantity::parse("0.0001").is_err());
        assert!(Quantity::parse("lots").is_err());
    }

    #[test]
    fn test_checked_deduct() {
        let stock = Quantity::from_units(120);
        assert_eq!(
            stock.checked_deduct(Quantity::from_units(100)),
            Some(Quantity::from_units(20))
        );
        assert_eq!(stock.checked_deduct(Quantity::from_units(120)), Some(Quantity::zero()));
        assert_eq!(stock.checked_deduct(Quantity::from_units(150)), None);
    }

    #[test]
    fn test_bulk_multiplication_is_exact() {
        // 0.1 × 30 is exactly 3 here, unlike f64
        let dash = Quantity::parse("0.1").unwrap();
        assert_eq!(dash.checked_mul(30), Some(Quantity::from_units(3)));
    }

    #[test]
    fn test_overflow_is_reported() {
        let vat = Quantity::parse("5000000000000000").unwrap();
        assert_eq!(vat.checked_mul(2), None);
        assert_eq!(vat.checked_add(vat), None);
        assert_eq!(vat.checked_add(Quantity::from_units(1)).map(|q| q.milli()), Some(5_000_000_000_000_001_000));
    }
}
