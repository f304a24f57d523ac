//! # Selection & Pricing Engine
//!
//! Turns the purchase screen's selection rows into a priced [`PurchaseQuote`].
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  selections: [SelectionLine]                                            │
//! │        │                                                                │
//! │        ▼  keep selected rows only                                       │
//! │  empty? ─────────────────────────────────────────► NoSelection          │
//! │        │                                                                │
//! │        ▼  every count numeric, 1..=MAX_ITEM_QUANTITY                    │
//! │  bad row? ───────────────────────────────────────► InvalidCount         │
//! │        │                                                                │
//! │        ▼  merge rows for the same recipe, re-check the cap              │
//! │  too many? ──────────────────────────────────────► InvalidCount         │
//! │        │                                                                │
//! │        ▼  resolve against the catalog                                   │
//! │  unknown id? ────────────────────────────────────► UnknownRecipe        │
//! │  no requirements / no price? ────────────────────► RecipeNotPurchasable │
//! │        │                                                                │
//! │        ▼  checked price × count, Σ lines, Σ ingredient needs            │
//! │  overflow? ──────────────────────────────────────► AmountOutOfRange     │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  PurchaseQuote { lines, total_price = Σ price × count }                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One bad row rejects the whole quote. There is no partial fulfilment.

use std::collections::HashMap;

use crate::error::{PurchaseError, PurchaseResult};
use crate::money::Money;
use crate::types::{PurchaseQuote, QuoteLine, Recipe, SelectionLine};
use crate::validation::validate_count;

/// Prices a selection against the catalog.
///
/// Pure: the same catalog and selection always give the same result.
///
/// ## Example
/// ```rust
/// use brew_core::{quote, Money, PurchaseError, Quantity, Recipe, RecipeIngredient, SelectionLine};
///
/// let latte = Recipe::new(
///     "Latte",
///     Money::from_cents(350),
///     vec![RecipeIngredient::new("Milk", Quantity::from_units(100))],
/// );
/// let catalog = vec![latte.clone()];
///
/// let priced = quote(&catalog, &[SelectionLine::new(latte.id.clone(), 2)]).unwrap();
/// assert_eq!(priced.total_price, Money::from_cents(700));
///
/// let none = quote(&catalog, &[SelectionLine::unselected(latte.id.clone())]);
/// assert_eq!(none, Err(PurchaseError::NoSelection));
/// ```
pub fn quote(recipes: &[Recipe], selections: &[SelectionLine]) -> PurchaseResult<PurchaseQuote> {
    let catalog: HashMap<&str, &Recipe> = recipes.iter().map(|r| (r.id.as_str(), r)).collect();
    let label = |recipe_id: &str| -> String {
        catalog
            .get(recipe_id)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| recipe_id.to_string())
    };

    let selected: Vec<&SelectionLine> = selections.iter().filter(|l| l.selected).collect();
    if selected.is_empty() {
        return Err(PurchaseError::NoSelection);
    }

    let invalid = |recipe_id: &str, input: String| PurchaseError::InvalidCount {
        recipe: label(recipe_id),
        input,
    };

    // Merge rows per recipe, keeping the order recipes were first selected
    let mut merged: Vec<(&str, i64)> = Vec::new();
    for line in &selected {
        let count = line
            .quantity
            .ok_or_else(|| invalid(line.recipe_id.as_str(), "(not a whole number)".to_string()))?;
        validate_count(count).map_err(|e| invalid(line.recipe_id.as_str(), format!("{count} ({e})")))?;

        match merged.iter_mut().find(|(id, _)| *id == line.recipe_id) {
            Some((_, total)) => *total = total.saturating_add(count),
            None => merged.push((line.recipe_id.as_str(), count)),
        }
    }

    let mut lines = Vec::with_capacity(merged.len());
    let mut total_price = Money::zero();
    for (recipe_id, count) in merged {
        validate_count(count).map_err(|e| invalid(recipe_id, format!("{count} ({e})")))?;

        let recipe = catalog
            .get(recipe_id)
            .copied()
            .ok_or_else(|| PurchaseError::UnknownRecipe {
                recipe_id: recipe_id.to_string(),
            })?;

        if let Some(reason) = recipe.unpurchasable_reason() {
            return Err(PurchaseError::RecipeNotPurchasable {
                recipe: recipe.name.clone(),
                reason: reason.to_string(),
            });
        }

        let out_of_range = || PurchaseError::AmountOutOfRange {
            recipe: recipe.name.clone(),
        };
        let line_total = recipe.price.checked_mul(count).ok_or_else(out_of_range)?;
        total_price = total_price.checked_add(line_total).ok_or_else(out_of_range)?;

        lines.push(QuoteLine {
            recipe: recipe.clone(),
            quantity: count,
            line_total,
        });
    }

    let quote = PurchaseQuote { lines, total_price };
    // Ingredient needs must fit too, or the stock check could not run
    quote.requirements()?;

    Ok(quote)
}

// =============================================================================
// Unit Tests
// =============================================================================
