//! # Checkout Service
//!
//! Runs one purchase end to end against the stores:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Purchase Flow                                    │
//! │                                                                         │
//! │  quote(selections)                                                     │
//! │    ├── catalog.list()            load recipes                          │
//! │    ├── brew_core::quote          validate + price                      │
//! │    ├── stock.list()              live stock                            │
//! │    └── check_sufficiency         gate before asking for payment        │
//! │                                                                         │
//! │  pay(quote, payment)                                                   │
//! │    ├── stock.list()              stock may have moved since quoting    │
//! │    ├── brew_core::settle         payment checks + deduction plan       │
//! │    └── stock.apply_deductions    one atomic batch                      │
//! │                                                                         │
//! │  Any failure leaves stock untouched; the caller may retry `pay`.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::{check_sufficiency, quote, settle, Money, PurchaseError, PurchaseQuote, SelectionLine, SettlementResult};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::DbError;
use crate::store::{IngredientStore, RecipeCatalog};

/// Why a checkout step failed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The purchase was rejected; the user can correct it and retry.
    #[error(transparent)]
    Purchase(#[from] PurchaseError),

    /// A store call failed. Nothing was committed.
    #[error("Could not record the purchase: {0}")]
    Persistence(#[from] DbError),
}

impl CheckoutError {
    /// Machine-readable code for UI handling.
    pub fn code(&self) -> &'static str {
        match self {
            CheckoutError::Purchase(e) => e.code(),
            CheckoutError::Persistence(e) => e.code(),
        }
    }
}

/// Purchase workflow over an ingredient store and a recipe catalog.
///
/// ## Usage
/// ```rust,ignore
/// let checkout = db.checkout();
/// let quote = checkout.quote(&selections).await?;
/// let receipt = checkout.pay(&quote, Some(Money::from_cents(1000))).await?;
/// println!("Change: {}", receipt.change);
/// ```
#[derive(Debug, Clone)]
pub struct Checkout<S, C> {
    stock: S,
    catalog: C,
}

impl<S, C> Checkout<S, C>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    pub fn new(stock: S, catalog: C) -> Self {
        Checkout { stock, catalog }
    }

    /// Prices a selection and checks it against live stock.
    pub async fn quote(&self, selections: &[SelectionLine]) -> Result<PurchaseQuote, CheckoutError> {
        let recipes = self.catalog.list().await?;
        let quote = quote(&recipes, selections)?;

        let stock = self.stock.list().await?;
        check_sufficiency(&quote, &stock)?;

        debug!(
            lines = quote.lines.len(),
            total = %quote.total_price,
            "Quote ready for payment"
        );
        Ok(quote)
    }

    /// Takes payment for a quote and commits the stock deductions.
    ///
    /// On success the deductions are persisted and the result carries the
    /// change due. On any error nothing has been written.
    pub async fn pay(
        &self,
        quote: &PurchaseQuote,
        payment: Option<Money>,
    ) -> Result<SettlementResult, CheckoutError> {
        let stock = self.stock.list().await?;

        let settlement = settle(quote, &stock, payment).map_err(|e| {
            warn!(code = e.code(), error = %e, "Settlement rejected");
            e
        })?;

        self.stock
            .apply_deductions(&settlement.deductions)
            .await
            .map_err(|e| {
                warn!(error = %e, "Stock commit failed, nothing applied");
                e
            })?;

        info!(
            total = %settlement.total_price,
            tendered = %settlement.tendered,
            change = %settlement.change,
            "Purchase settled"
        );
        Ok(settlement)
    }

    /// The ingredient store this checkout commits to.
    pub fn stock(&self) -> &S {
        &self.stock
    }

    /// The recipe catalog this checkout prices from.
    pub fn catalog(&self) -> &C {
        &self.catalog
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
