//! # Stock Sufficiency Checker
//!
//! Decides whether live stock covers a quote, and if so how much of each
//! ingredient will be left.
//!
//! Needs are aggregated per ingredient name across every quote line before
//! they are compared against stock:
//!
//! ```text
//!   Latte ×1       needs Milk 100 ┐
//!                                 ├─► Milk 150  vs  stock 120  ─► short by 30
//!   Cappuccino ×1  needs Milk  50 ┘
//! ```
//!
//! A requirement whose name matches no ingredient is a shortage with
//! `available: None`. Every shortage is reported, not only the first.

use std::collections::HashMap;

use crate::error::{PurchaseError, PurchaseResult, Shortage};
use crate::types::{Ingredient, PurchaseQuote, StockDeduction};

/// Computes the deduction for every ingredient the quote touches.
///
/// Returns one [`StockDeduction`] per ingredient, in the order the quote's
/// requirements first name them, or `InsufficientStock` listing every
/// ingredient that falls short. A need too large to represent is
/// `AmountOutOfRange`.
pub fn plan_deductions(quote: &PurchaseQuote, stock: &[Ingredient]) -> PurchaseResult<Vec<StockDeduction>> {
    let by_name: HashMap<&str, &Ingredient> = stock.iter().map(|i| (i.name.as_str(), i)).collect();

    let mut plan = Vec::new();
    let mut shortages = Vec::new();

    for requirement in quote.requirements()? {
        let needed = requirement.amount;
        match by_name.get(requirement.name.as_str()) {
            Some(ingredient) => match ingredient.amount.checked_deduct(needed) {
                Some(remaining) => plan.push(StockDeduction {
                    ingredient_id: ingredient.id.clone(),
                    name: ingredient.name.clone(),
                    available: ingredient.amount,
                    needed,
                    remaining,
                }),
                None => shortages.push(Shortage {
                    name: requirement.name,
                    needed,
                    available: Some(ingredient.amount),
                }),
            },
            None => shortages.push(Shortage {
                name: requirement.name,
                needed,
                available: None,
            }),
        }
    }

    if !shortages.is_empty() {
        return Err(PurchaseError::InsufficientStock { shortages });
    }

    Ok(plan)
}

/// Checks that stock covers the quote. Gate before asking for payment.
///
/// ## Example
/// ```rust
/// use brew_core::{check_sufficiency, quote, Ingredient, Money, PurchaseError, Quantity,
///     Recipe, RecipeIngredient, SelectionLine};
///
/// let stock = vec![Ingredient::new("Milk", Quantity::from_units(120))];
/// let milk = |n| vec![RecipeIngredient::new("Milk", Quantity::from_units(n))];
/// let latte = Recipe::new("Latte", Money::from_cents(350), milk(100));
/// let cappuccino = Recipe::new("Cappuccino", Money::from_cents(300), milk(50));
///
/// let q = quote(
///     &[latte.clone(), cappuccino.clone()],
///     &[SelectionLine::new(latte.id.clone(), 1), SelectionLine::new(cappuccino.id.clone(), 1)],
/// )
/// .unwrap();
///
/// // Each recipe alone would fit; together they need 150.
/// assert!(matches!(
///     check_sufficiency(&q, &stock),
///     Err(PurchaseError::InsufficientStock { .. })
/// ));
/// ```
pub fn check_sufficiency(quote: &PurchaseQuote, stock: &[Ingredient]) -> PurchaseResult<()> {
    plan_deductions(quote, stock).map(|_| ())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::pricing::quote;
    use crate::quantity::Quantity;
    use crate::types::{QuoteLine, Recipe, RecipeIngredient, SelectionLine};

    fn units(n: i64) -> Quantity {
        Quantity::from_units(n)
    }

    fn recipe(name: &str, reqs: &[(&str, i64)]) -> Recipe {
        Recipe::new(
            name,
            Money::from_cents(300),
            reqs.iter().map(|(n, a)| RecipeIngredient::new(*n, units(*a))).collect(),
        )
    }

    fn quote_of(lines: &[(&Recipe, i64)]) -> PurchaseQuote {
        let catalog: Vec<Recipe> = lines.iter().map(|(r, _)| (*r).clone()).collect();
        let selections: Vec<SelectionLine> = lines
            .iter()
            .map(|(r, n)| SelectionLine::new(r.id.clone(), *n))
            .collect();
        quote(&catalog, &selections).unwrap()
    }

    #[test]
    fn test_needs_are_aggregated_across_recipes() {
        let stock = vec![Ingredient::new("Milk", units(120))];
        let latte = recipe("Latte", &[("Milk", 100)]);
        let cappuccino = recipe("Cappuccino", &[("Milk", 50)]);

        // Each alone passes
        assert!(check_sufficiency(&quote_of(&[(&latte, 1)]), &stock).is_ok());
        assert!(check_sufficiency(&quote_of(&[(&cappuccino, 1)]), &stock).is_ok());

        let both = quote_of(&[(&latte, 1), (&cappuccino, 1)]);
        assert_eq!(
            check_sufficiency(&both, &stock),
            Err(PurchaseError::InsufficientStock {
                shortages: vec![Shortage {
                    name: "Milk".to_string(),
                    needed: units(150),
                    available: Some(units(120)),
                }],
            })
        );
    }

    #[test]
    fn test_oversized_need_is_rejected_not_wrapped() {
        let vat = Quantity::parse("5000000000000000").unwrap();
        let urn = Recipe::new("Urn", Money::from_cents(300), vec![RecipeIngredient::new("Water", vat)]);
        let q = PurchaseQuote {
            lines: vec![QuoteLine {
                recipe: urn,
                quantity: 2,
                line_total: Money::from_cents(600),
            }],
            total_price: Money::from_cents(600),
        };
        let stock = vec![Ingredient::new("Water", vat)];

        assert_eq!(
            check_sufficiency(&q, &stock),
            Err(PurchaseError::AmountOutOfRange {
                recipe: "Urn".to_string(),
            })
        );
    }

    #[test]
    fn test_check_is_idempotent() {
        let stock = vec![Ingredient::new("Milk", units(120))];
        let latte = recipe("Latte", &[("Milk", 100)]);
        let q = quote_of(&[(&latte, 2)]);

        let first = check_sufficiency(&q, &stock);
        let second = check_sufficiency(&q, &stock);
        assert_eq!(first, second);
        assert!(first.is_err());
    }

    #[test]
    fn test_unmatched_name_fails_closed() {
        let stock = vec![Ingredient::new("Milk", units(500))];
        let mocha = recipe("Mocha", &[("Milk", 100), ("Chocolate", 20)]);

        let result = check_sufficiency(&quote_of(&[(&mocha, 1)]), &stock);
        assert_eq!(
            result,
            Err(PurchaseError::InsufficientStock {
                shortages: vec![Shortage {
                    name: "Chocolate".to_string(),
                    needed: units(20),
                    available: None,
                }],
            })
        );
    }

    #[test]
    fn test_every_shortage_is_reported() {
        let stock = vec![
            Ingredient::new("Milk", units(50)),
            Ingredient::new("Coffee", units(5)),
            Ingredient::new("Sugar", units(100)),
        ];
        let latte = recipe("Latte", &[("Milk", 100), ("Sugar", 5), ("Coffee", 10)]);

        match check_sufficiency(&quote_of(&[(&latte, 1)]), &stock) {
            Err(PurchaseError::InsufficientStock { shortages }) => {
                let names: Vec<&str> = shortages.iter().map(|s| s.name.as_str()).collect();
                assert_eq!(names, vec!["Milk", "Coffee"]);
            }
            other => panic!("expected InsufficientStock, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_allows_exact_depletion() {
        let milk = Ingredient::new("Milk", units(200));
        let stock = vec![milk.clone()];
        let latte = recipe("Latte", &[("Milk", 100)]);

        let plan = plan_deductions(&quote_of(&[(&latte, 2)]), &stock).unwrap();
        assert_eq!(
            plan,
            vec![StockDeduction {
                ingredient_id: milk.id,
                name: "Milk".to_string(),
                available: units(200),
                needed: units(200),
                remaining: Quantity::zero(),
            }]
        );
    }

    #[test]
    fn test_fractional_amounts() {
        let stock = vec![Ingredient::new("Cinnamon", Quantity::parse("1.5").unwrap())];
        let chai = Recipe::new(
            "Chai",
            Money::from_cents(300),
            vec![RecipeIngredient::new("Cinnamon", Quantity::parse("0.5").unwrap())],
        );

        assert!(check_sufficiency(&quote_of(&[(&chai, 3)]), &stock).is_ok());
        assert!(check_sufficiency(&quote_of(&[(&chai, 4)]), &stock).is_err());
    }
}
