//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brew-core errors (this file)                                          │
//! │  ├── PurchaseError    - Quote, sufficiency and payment failures        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  brew-db errors (separate crate)                                       │
//! │  ├── DbError          - Store/catalog failures (NotFound, Conflict)    │
//! │  └── CheckoutError    - PurchaseError | persistence failure            │
//! │                                                                         │
//! │  Flow: PurchaseError → CheckoutError → CLI message / exit code         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every purchase failure is recoverable: the caller re-prompts with the
//! specific reason. None of them should end the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

use crate::money::Money;
use crate::quantity::Quantity;

// =============================================================================
// Purchase Error
// =============================================================================

/// Why a purchase attempt was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    /// No recipe was marked for purchase.
    #[error("Please select at least one recipe to purchase")]
    NoSelection,

    /// A selected recipe has a zero, negative, oversized or non-numeric count.
    ///
    /// One bad line rejects the whole quote; partial fulfilment is not offered.
    #[error("Invalid count {input} for recipe {recipe}")]
    InvalidCount { recipe: String, input: String },

    /// A selection points at a recipe that is not in the catalog.
    #[error("Recipe not found: {recipe_id}")]
    UnknownRecipe { recipe_id: String },

    /// A line total, the quote total or an ingredient need does not fit the
    /// fixed-point range.
    #[error("Amounts for recipe {recipe} are too large to process")]
    AmountOutOfRange { recipe: String },

    /// The recipe exists but cannot be sold (no requirements, no price).
    #[error("Recipe {recipe} cannot be purchased: {reason}")]
    RecipeNotPurchasable { recipe: String, reason: String },

    /// Aggregate requirements exceed stock for at least one ingredient.
    ///
    /// ## User Workflow
    /// ```text
    /// Latte ×1 (Milk 100) + Cappuccino ×1 (Milk 50)
    ///      │
    ///      ▼
    /// Aggregate: Milk 150, stock 120
    ///      │
    ///      ▼
    /// InsufficientStock { shortages: [Milk: needed 150, available 120] }
    /// ```
    #[error("Not enough ingredients in stock: {}", join_shortages(.shortages))]
    InsufficientStock { shortages: Vec<Shortage> },

    /// No payment was entered.
    #[error("Please enter a payment")]
    MissingPayment,

    /// The payment is not a positive amount.
    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },

    /// The payment does not cover the quoted total.
    #[error("Payment {tendered} is less than the total {total}")]
    PaymentTooLow { total: Money, tendered: Money },
}

impl PurchaseError {
    /// Machine-readable code for UI handling.
    pub fn code(&self) -> &'static str {
        match self {
            PurchaseError::NoSelection => "NO_SELECTION",
            PurchaseError::InvalidCount { .. } => "INVALID_COUNT",
            PurchaseError::UnknownRecipe { .. } => "NOT_FOUND",
            PurchaseError::AmountOutOfRange { .. } => "AMOUNT_OUT_OF_RANGE",
            PurchaseError::RecipeNotPurchasable { .. } => "RECIPE_NOT_PURCHASABLE",
            PurchaseError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            PurchaseError::MissingPayment => "MISSING_PAYMENT",
            PurchaseError::InvalidPayment { .. } => "INVALID_PAYMENT",
            PurchaseError::PaymentTooLow { .. } => "PAYMENT_TOO_LOW",
        }
    }
}

/// One ingredient whose aggregate need is not covered by stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shortage {
    /// Ingredient name as referenced by the recipes.
    pub name: String,
    /// Total needed across every selected recipe.
    pub needed: Quantity,
    /// On-hand amount, or `None` when no ingredient has this name.
    pub available: Option<Quantity>,
}

impl fmt::Display for Shortage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.available {
            Some(available) => write!(
                f,
                "{}: needed {}, available {}",
                self.name, self.needed, available
            ),
            None => write!(f, "{}: needed {}, not in inventory", self.name, self.needed),
        }
    }
}

fn join_shortages(shortages: &[Shortage]) -> String {
    shortages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before anything reaches the stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be greater than 0")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, malformed decimal).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A recipe names the same ingredient twice.
    #[error("{field} '{value}' is listed more than once")]
    Repeated { field: String, value: String },

    /// A recipe names an ingredient that is not in the inventory.
    #[error("ingredient '{name}' is not in the inventory")]
    UnknownIngredient { name: String },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience alias for purchase engine results.
pub type PurchaseResult<T> = Result<T, PurchaseError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_lists_every_shortage() {
        let err = PurchaseError::InsufficientStock {
            shortages: vec![
                Shortage {
                    name: "Milk".to_string(),
                    needed: Quantity::from_units(150),
                    available: Some(Quantity::from_units(120)),
                },
                Shortage {
                    name: "Cinnamon".to_string(),
                    needed: Quantity::from_units(2),
                    available: None,
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "Not enough ingredients in stock: Milk: needed 150, available 120; \
             Cinnamon: needed 2, not in inventory"
        );
    }

    #[test]
    fn test_payment_too_low_message() {
        let err = PurchaseError::PaymentTooLow {
            total: Money::from_cents(900),
            tendered: Money::from_cents(500),
        };
        assert_eq!(err.to_string(), "Payment $5.00 is less than the total $9.00");
        assert_eq!(err.code(), "PAYMENT_TOO_LOW");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::MustBePositive {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must be greater than 0");
    }
}
