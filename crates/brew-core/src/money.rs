//! # Money Module
//!
//! Provides the `Money` type for recipe prices, totals, payments and change.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Ten lattes at $3.10 summed as floats drift away from $31.00,           │
//! │  and "payment >= total" comparisons start lying.                        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    310 cents × 10 = 3100 cents, exactly                                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use brew_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(350); // $3.50
//!
//! // Or parse what the customer typed
//! let tendered = Money::parse("10").unwrap();
//!
//! let total = price.checked_mul(2).unwrap();
//! assert_eq!((tendered - total).cents(), 300);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::fixed;

/// Number of decimal places in a money amount.
const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values exist transiently (payment minus total
///   before validation) and are rejected at the edges
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money Flows
/// ```text
/// Recipe.price ──► QuoteLine.line_total ──► PurchaseQuote.total_price
///                                                    │
///                      tendered payment ─────────────┤
///                                                    ▼
///                                     SettlementResult.change
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses decimal text such as `"3.50"`, `"3.5"` or `"3"`.
    ///
    /// ## Rules
    /// - At most two fractional digits (no silent rounding)
    /// - No exponents, currency symbols or thousands separators
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// assert_eq!(Money::parse("3.5").unwrap().cents(), 350);
    /// assert!(Money::parse("3.505").is_err());
    /// assert!(Money::parse("three").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        fixed::parse_scaled(text, MONEY_SCALE)
            .map(Money)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("'{}' is not a decimal amount with at most two decimals", text.trim()),
            })
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a recipe count, `None` on overflow.
    ///
    /// Prices are only bounded by what `parse` accepts, so a line total can
    /// exceed `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(350); // $3.50
    /// assert_eq!(unit_price.checked_mul(2), Some(Money::from_cents(700)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub fn checked_mul(self, count: i64) -> Option<Money> {
        self.0.checked_mul(count).map(Money)
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Returns the amount as plain decimal text without a currency symbol
    /// (`"3.50"`). Used for storage-neutral output such as JSON.
    pub fn to_decimal_string(&self) -> String {
        fixed::format_scaled(self.0, MONEY_SCALE, MONEY_SCALE as usize)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-grade display (`$3.50`). Localized formatting belongs to the UI.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_cents(900).to_decimal_string(), "9.00");
        assert_eq!(Money::from_cents(5).to_decimal_string(), "0.05");
    }

    #[test]
    fn test_parse() {
        assert_eq!(Money::parse("9").unwrap(), Money::from_cents(900));
        assert_eq!(Money::parse("3.5").unwrap(), Money::from_cents(350));
        assert_eq!(Money::parse("0.01").unwrap(), Money::from_cents(1));
        assert_eq!(Money::parse("-2").unwrap(), Money::from_cents(-200));

        assert!(Money::parse("").is_err());
        assert!(Money::parse("$3").is_err());
        assert!(Money::parse("1,000").is_err());
        assert!(Money::parse("0.001").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_sum_has_no_drift() {
        // Ten $0.10 items sum to exactly $1.00
        let total = std::iter::repeat(Money::from_cents(10))
            .take(10)
            .try_fold(Money::zero(), Money::checked_add);
        assert_eq!(total, Some(Money::from_cents(100)));
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = Money::parse("50000000000000000").unwrap();
        assert_eq!(huge.checked_mul(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(Money::from_cents(i64::MIN).checked_mul(-1), None);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
