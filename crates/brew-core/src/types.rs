//! # Domain Types
//!
//! Core domain types used throughout Brew Counter.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Persistent (owned by the stores)                                       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │   Ingredient    │   │     Recipe      │   │ RecipeIngredient │      │
//! │  │  ─────────────  │   │  ─────────────  │   │  ──────────────  │      │
//! │  │  id (UUID)      │   │  id (UUID)      │◄──│  name (by name!) │      │
//! │  │  name (unique)  │   │  name (unique)  │   │  amount per unit │      │
//! │  │  amount >= 0    │   │  price > 0      │   └──────────────────┘      │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  Transient (one purchase attempt, never persisted)                      │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌──────────────────┐      │
//! │  │ SelectionLine   │──►│ PurchaseQuote   │──►│ SettlementResult │      │
//! │  │  recipe_id      │   │  lines          │   │  change          │      │
//! │  │  selected, qty  │   │  total_price    │   │  deductions      │      │
//! │  └─────────────────┘   └─────────────────┘   └──────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Recipe requirements reference ingredients **by name**. Anything that
//! resolves them (sufficiency, settlement) treats an unknown name as a
//! shortage rather than skipping it.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{PurchaseError, PurchaseResult};
use crate::money::Money;
use crate::quantity::Quantity;

/// Generates a new entity ID.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Ingredient
// =============================================================================

/// A named stock item with its on-hand amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the inventory.
    pub name: String,

    /// On-hand amount. Never negative.
    pub amount: Quantity,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Ingredient {
    /// Creates an ingredient with a fresh ID (not yet stored anywhere).
    pub fn new(name: impl Into<String>, amount: Quantity) -> Self {
        let now = Utc::now();
        Ingredient {
            id: generate_id(),
            name: name.into(),
            amount,
            created_at: now,
            updated_at: now,
        }
    }
}

// =============================================================================
// Recipe
// =============================================================================

/// Required amount of one ingredient for a single unit of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecipeIngredient {
    /// Name of the ingredient in the inventory.
    pub name: String,

    /// Amount needed per recipe unit. Always positive.
    pub amount: Quantity,
}

impl RecipeIngredient {
    pub fn new(name: impl Into<String>, amount: Quantity) -> Self {
        RecipeIngredient {
            name: name.into(),
            amount,
        }
    }
}

/// A priced product made from inventory ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, unique across the catalog.
    pub name: String,

    /// Price of one unit.
    pub price: Money,

    /// Requirements, in the order they were entered.
    pub recipe_ingredients: Vec<RecipeIngredient>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Creates a recipe with a fresh ID (not yet stored anywhere).
    pub fn new(name: impl Into<String>, price: Money, recipe_ingredients: Vec<RecipeIngredient>) -> Self {
        let now = Utc::now();
        Recipe {
            id: generate_id(),
            name: name.into(),
            price,
            recipe_ingredients,
            created_at: now,
            updated_at: now,
        }
    }

    /// Explains why this recipe cannot be sold, if it cannot.
    pub fn unpurchasable_reason(&self) -> Option<&'static str> {
        if !self.price.is_positive() {
            return Some("price must be greater than 0");
        }
        if self.recipe_ingredients.is_empty() {
            return Some("recipe has no ingredients");
        }
        if self.recipe_ingredients.iter().any(|r| !r.amount.is_positive()) {
            return Some("every ingredient amount must be greater than 0");
        }
        None
    }
}

/// Fields supplied when creating or replacing a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub name: String,
    pub price: Money,
    pub recipe_ingredients: Vec<RecipeIngredient>,
}

// =============================================================================
// Selection Line
// =============================================================================

/// One row of the purchase screen: a recipe, whether it is ticked, and the
/// count typed next to it.
///
/// The UI rebuilds the whole `Vec<SelectionLine>` on every edit and hands it
/// to [`quote`](crate::quote) as a value; rows are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SelectionLine {
    pub recipe_id: String,

    /// Only selected lines take part in a purchase.
    pub selected: bool,

    /// The typed count, or `None` if the text was not a whole number.
    pub quantity: Option<i64>,
}

impl SelectionLine {
    /// A selected line with a numeric count.
    pub fn new(recipe_id: impl Into<String>, quantity: i64) -> Self {
        SelectionLine {
            recipe_id: recipe_id.into(),
            selected: true,
            quantity: Some(quantity),
        }
    }

    /// A line built from raw form input.
    ///
    /// ## Example
    /// ```rust
    /// use brew_core::SelectionLine;
    ///
    /// assert_eq!(SelectionLine::from_input("r1", true, " 3 ").quantity, Some(3));
    /// assert_eq!(SelectionLine::from_input("r1", true, "two").quantity, None);
    /// assert_eq!(SelectionLine::from_input("r1", true, "1.5").quantity, None);
    /// ```
    pub fn from_input(recipe_id: impl Into<String>, selected: bool, raw: &str) -> Self {
        SelectionLine {
            recipe_id: recipe_id.into(),
            selected,
            quantity: raw.trim().parse().ok(),
        }
    }

    /// A row the user left unticked.
    pub fn unselected(recipe_id: impl Into<String>) -> Self {
        SelectionLine {
            recipe_id: recipe_id.into(),
            selected: false,
            quantity: None,
        }
    }
}

// =============================================================================
// Purchase Quote
// =============================================================================

/// A priced recipe line inside a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    /// Snapshot of the recipe at quoting time.
    pub recipe: Recipe,
    pub quantity: i64,
    /// `recipe.price × quantity`
    pub line_total: Money,
}

/// A validated, priced selection awaiting payment.
///
/// Created by [`quote`](crate::quote); dropped after settlement or when the
/// customer walks away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseQuote {
    /// One line per distinct recipe, in selection order.
    pub lines: Vec<QuoteLine>,
    /// Sum of every line total.
    pub total_price: Money,
}

impl PurchaseQuote {
    /// Total need per ingredient across every line, keyed by ingredient
    /// name, in the order names first appear.
    ///
    /// ## Example
    /// ```text
    /// Latte ×1:      Milk 100, Coffee 10
    /// Cappuccino ×2: Milk 50,  Coffee 10
    ///
    /// requirements() → [Milk 200, Coffee 30]
    /// ```
    ///
    /// Fails with `AmountOutOfRange` when a need overflows.
    pub fn requirements(&self) -> PurchaseResult<Vec<RecipeIngredient>> {
        let mut totals: Vec<RecipeIngredient> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for line in &self.lines {
            let out_of_range = || PurchaseError::AmountOutOfRange {
                recipe: line.recipe.name.clone(),
            };
            for requirement in &line.recipe.recipe_ingredients {
                let needed = requirement
                    .amount
                    .checked_mul(line.quantity)
                    .ok_or_else(out_of_range)?;
                match index.get(requirement.name.as_str()) {
                    Some(&i) => {
                        totals[i].amount = totals[i].amount.checked_add(needed).ok_or_else(out_of_range)?;
                    }
                    None => {
                        index.insert(&requirement.name, totals.len());
                        totals.push(RecipeIngredient::new(requirement.name.clone(), needed));
                    }
                }
            }
        }

        Ok(totals)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// The planned stock change for one ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockDeduction {
    pub ingredient_id: String,
    pub name: String,
    /// Amount the plan was computed from.
    pub available: Quantity,
    pub needed: Quantity,
    /// `available - needed`, never negative.
    pub remaining: Quantity,
}

/// Outcome of a paid quote: the change due and the new stock levels.
///
/// The caller persists `deductions` through the ingredient store in one
/// batch; until that succeeds nothing has been committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub total_price: Money,
    pub tendered: Money,
    /// `tendered - total_price`, never negative.
    pub change: Money,
    /// One entry per affected ingredient, in requirement order.
    pub deductions: Vec<StockDeduction>,
    /// Ingredient name → amount after the purchase.
    pub updated_ingredients: BTreeMap<String, Quantity>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, price_cents: i64, reqs: &[(&str, i64)]) -> Recipe {
        Recipe::new(
            name,
            Money::from_cents(price_cents),
            reqs.iter()
                .map(|(n, a)| RecipeIngredient::new(*n, Quantity::from_units(*a)))
                .collect(),
        )
    }

    #[test]
    fn test_requirements_aggregate_in_first_appearance_order() {
        let latte = recipe("Latte", 350, &[("Milk", 100), ("Coffee", 10)]);
        let cappuccino = recipe("Cappuccino", 300, &[("Coffee", 10), ("Milk", 50)]);
        let quote = PurchaseQuote {
            lines: vec![
                QuoteLine {
                    recipe: latte,
                    quantity: 1,
                    line_total: Money::from_cents(350),
                },
                QuoteLine {
                    recipe: cappuccino,
                    quantity: 2,
                    line_total: Money::from_cents(600),
                },
            ],
            total_price: Money::from_cents(950),
        };

        let totals = quote.requirements().unwrap();
        assert_eq!(
            totals,
            vec![
                RecipeIngredient::new("Milk", Quantity::from_units(200)),
                RecipeIngredient::new("Coffee", Quantity::from_units(30)),
            ]
        );
    }

    #[test]
    fn test_unpurchasable_reason() {
        assert_eq!(recipe("Latte", 350, &[("Milk", 100)]).unpurchasable_reason(), None);
        assert!(recipe("Water", 100, &[]).unpurchasable_reason().is_some());
        assert!(recipe("Free", 0, &[("Milk", 1)]).unpurchasable_reason().is_some());
    }

    #[test]
    fn test_selection_line_from_input() {
        assert_eq!(SelectionLine::from_input("r", true, "0").quantity, Some(0));
        assert_eq!(SelectionLine::from_input("r", true, "-2").quantity, Some(-2));
        assert_eq!(SelectionLine::from_input("r", true, "").quantity, None);
        assert!(!SelectionLine::unselected("r").selected);
    }

    #[test]
    fn test_recipe_wire_format_uses_camel_case() {
        let latte = recipe("Latte", 350, &[("Milk", 100)]);
        let json = serde_json::to_value(&latte).unwrap();
        assert_eq!(json["name"], "Latte");
        assert_eq!(json["price"], 350);
        assert_eq!(json["recipeIngredients"][0]["name"], "Milk");
        assert_eq!(json["recipeIngredients"][0]["amount"], 100_000);
    }
}
