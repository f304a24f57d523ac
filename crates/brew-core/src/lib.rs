//! # brew-core: Pure Purchase Logic for Brew Counter
//!
//! This crate is the **heart** of Brew Counter. It prices recipe selections,
//! checks them against stock and settles payments as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Brew Counter Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront UI / `brew` CLI                      │   │
//! │  │     Select recipes ──► Generate cost ──► Pay ──► Change         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brew-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐  │   │
//! │  │   │  pricing  │  │sufficiency │  │ settlement │  │validation│  │   │
//! │  │   │   quote   │─►│   check    │─►│   settle   │  │  rules   │  │   │
//! │  │   └───────────┘  └────────────┘  └────────────┘  └──────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    brew-db (Database Layer)                     │   │
//! │  │        Ingredient store, recipe catalog, atomic commit          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Ingredient, Recipe, SelectionLine, PurchaseQuote, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`quantity`] - Fixed-point ingredient amounts
//! - [`pricing`] - Selection & pricing engine
//! - [`sufficiency`] - Stock sufficiency checker
//! - [`settlement`] - Checkout/settlement engine
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use brew_core::{check_sufficiency, quote, settle, Ingredient, Money, Quantity, Recipe,
//!     RecipeIngredient, SelectionLine};
//!
//! let stock = vec![Ingredient::new("Milk", Quantity::from_units(500))];
//! let latte = Recipe::new(
//!     "Latte",
//!     Money::from_cents(350),
//!     vec![RecipeIngredient::new("Milk", Quantity::from_units(100))],
//! );
//!
//! let selection = vec![SelectionLine::new(latte.id.clone(), 2)];
//! let quote = quote(&[latte], &selection).unwrap();
//! assert_eq!(quote.total_price, Money::from_cents(700));
//!
//! check_sufficiency(&quote, &stock).unwrap();
//!
//! let settled = settle(&quote, &stock, Some(Money::from_cents(1000))).unwrap();
//! assert_eq!(settled.change, Money::from_cents(300));
//! assert_eq!(settled.updated_ingredients["Milk"], Quantity::from_units(300));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
mod fixed;
pub mod money;
pub mod pricing;
pub mod quantity;
pub mod settlement;
pub mod sufficiency;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{PurchaseError, PurchaseResult, Shortage, ValidationError};
pub use money::Money;
pub use pricing::quote;
pub use quantity::Quantity;
pub use settlement::{parse_tender, settle};
pub use sufficiency::{check_sufficiency, plan_deductions};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum count of a single recipe in one purchase.
///
/// Stops accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum length of ingredient and recipe names.
pub const MAX_NAME_LENGTH: usize = 100;
