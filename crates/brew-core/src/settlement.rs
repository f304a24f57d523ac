//! # Checkout/Settlement Engine
//!
//! Validates a tendered payment against a quote and produces the change and
//! the stock deduction plan.
//!
//! ## State Machine (one purchase attempt)
//! ```text
//!                ┌──────────┐
//!                │  Quoted  │
//!                └────┬─────┘
//!                     │ validate payment
//!       ┌─────────────┼───────────────────────────────┐
//!       │ absent      │ <= 0          │ < total        │ ok
//!       ▼             ▼               ▼                ▼
//!  MissingPayment  InvalidPayment  PaymentTooLow   re-check stock
//!                                                      │
//!                                   short? ────────────┼──► InsufficientStock
//!                                                      ▼
//!                                              ┌──────────────┐
//!                                              │  Committing  │ (caller: brew-db)
//!                                              └──────┬───────┘
//!                                                     ▼
//!                                                 Committed
//! ```
//!
//! [`settle`] is pure. It never touches the stock it is given; the caller
//! persists [`SettlementResult::deductions`] as one atomic batch.

use std::collections::BTreeMap;

use crate::error::{PurchaseError, PurchaseResult};
use crate::money::Money;
use crate::sufficiency::plan_deductions;
use crate::types::{Ingredient, PurchaseQuote, SettlementResult};

/// Parses the payment field.
///
/// Blank input is `Ok(None)` so that [`settle`] can report
/// [`PurchaseError::MissingPayment`]. Text that is not a decimal amount is
/// [`PurchaseError::InvalidPayment`].
///
/// ## Example
/// ```rust
/// use brew_core::{parse_tender, Money};
///
/// assert_eq!(parse_tender("10").unwrap(), Some(Money::from_cents(1000)));
/// assert_eq!(parse_tender("  ").unwrap(), None);
/// assert!(parse_tender("ten").is_err());
/// ```
pub fn parse_tender(raw: &str) -> PurchaseResult<Option<Money>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    Money::parse(raw)
        .map(Some)
        .map_err(|e| PurchaseError::InvalidPayment { reason: e.to_string() })
}

/// Settles a quote against current stock.
///
/// Payment is checked before stock so the customer fixes the cheap mistake
/// first. Stock is checked again here because it may have moved since the
/// quote was made.
pub fn settle(
    quote: &PurchaseQuote,
    stock: &[Ingredient],
    payment: Option<Money>,
) -> PurchaseResult<SettlementResult> {
    let tendered = payment.ok_or(PurchaseError::MissingPayment)?;

    if !tendered.is_positive() {
        return Err(PurchaseError::InvalidPayment {
            reason: "payment must be greater than 0".to_string(),
        });
    }

    if tendered < quote.total_price {
        return Err(PurchaseError::PaymentTooLow {
            total: quote.total_price,
            tendered,
        });
    }

    let deductions = plan_deductions(quote, stock)?;

    let updated_ingredients: BTreeMap<_, _> = deductions
        .iter()
        .map(|d| (d.name.clone(), d.remaining))
        .collect();

    Ok(SettlementResult {
        total_price: quote.total_price,
        tendered,
        change: tendered - quote.total_price,
        deductions,
        updated_ingredients,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
