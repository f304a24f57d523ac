//! # Validation Module
//!
//! Input validation for ingredients and recipes before they reach the stores.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront form / CLI arguments                              │
//! │  ├── Decimal parsing (Money::parse, Quantity::parse)                   │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Names, prices, amounts                                            │
//! │  └── Recipe requirements (non-empty, positive, no repeats, known)      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE(name) on ingredients and recipes                           │
//! │  └── CHECK constraints on amount_milli / price_cents                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Purchase-time checks (selection counts, stock, payment) live in the
//! engines themselves and report [`PurchaseError`](crate::PurchaseError).
//!
//! ## Usage
//! ```rust
//! use brew_core::validation::{validate_ingredient_name, validate_ingredient_amount};
//! use brew_core::Quantity;
//!
//! validate_ingredient_name("Milk").unwrap();
//! validate_ingredient_amount(Quantity::from_units(500)).unwrap();
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::money::Money;
use crate::quantity::Quantity;
use crate::types::{Ingredient, NewRecipe, RecipeIngredient};
use crate::{MAX_ITEM_QUANTITY, MAX_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Names
// =============================================================================

fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an ingredient name.
///
/// ## Example
/// ```rust
/// use brew_core::validation::validate_ingredient_name;
///
/// assert!(validate_ingredient_name("Chocolate").is_ok());
/// assert!(validate_ingredient_name("   ").is_err());
/// ```
pub fn validate_ingredient_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a recipe name.
pub fn validate_recipe_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates an on-hand ingredient amount. Zero is allowed (sold out).
pub fn validate_ingredient_amount(amount: Quantity) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "amount".to_string(),
        });
    }
    Ok(())
}

/// Validates a recipe price. Free recipes are not allowed.
pub fn validate_recipe_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates a per-recipe purchase count.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed [`MAX_ITEM_QUANTITY`]
pub fn validate_count(count: i64) -> ValidationResult<()> {
    if count <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "count".to_string(),
        });
    }

    if count > MAX_ITEM_QUANTITY {
        return Err(ValidationError::InvalidFormat {
            field: "count".to_string(),
            reason: format!("cannot exceed {}", MAX_ITEM_QUANTITY),
        });
    }

    Ok(())
}

// =============================================================================
// Recipe Requirements
// =============================================================================

/// Validates the requirement list of a recipe.
///
/// ## Rules
/// - At least one requirement
/// - Every requirement has a valid name and an amount greater than 0
/// - No ingredient is named twice
pub fn validate_requirements(requirements: &[RecipeIngredient]) -> ValidationResult<()> {
    if requirements.is_empty() {
        return Err(ValidationError::Required {
            field: "ingredients".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for requirement in requirements {
        validate_name("ingredient name", &requirement.name)?;

        if !requirement.amount.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: format!("amount of {}", requirement.name.trim()),
            });
        }

        if !seen.insert(requirement.name.trim()) {
            return Err(ValidationError::Repeated {
                field: "ingredient".to_string(),
                value: requirement.name.trim().to_string(),
            });
        }
    }

    Ok(())
}

/// Validates a recipe before it is created or replaced.
///
/// When `stock` is supplied, every requirement must name an ingredient in
/// it. Pass `None` to skip that check (for example when importing a catalog
/// ahead of the inventory).
///
/// ## Example
/// ```rust
/// use brew_core::validation::validate_new_recipe;
/// use brew_core::{Ingredient, Money, NewRecipe, Quantity, RecipeIngredient};
///
/// let stock = vec![Ingredient::new("Milk", Quantity::from_units(500))];
/// let mocha = NewRecipe {
///     name: "Mocha".to_string(),
///     price: Money::from_cents(400),
///     recipe_ingredients: vec![RecipeIngredient::new("Chocolate", Quantity::from_units(20))],
/// };
///
/// assert!(validate_new_recipe(&mocha, None).is_ok());
/// assert!(validate_new_recipe(&mocha, Some(&stock)).is_err());
/// ```
pub fn validate_new_recipe(recipe: &NewRecipe, stock: Option<&[Ingredient]>) -> ValidationResult<()> {
    validate_recipe_name(&recipe.name)?;
    validate_recipe_price(recipe.price)?;
    validate_requirements(&recipe.recipe_ingredients)?;

    if let Some(stock) = stock {
        let known: HashSet<&str> = stock.iter().map(|i| i.name.as_str()).collect();
        if let Some(missing) = recipe
            .recipe_ingredients
            .iter()
            .find(|r| !known.contains(r.name.trim()))
        {
            return Err(ValidationError::UnknownIngredient {
                name: missing.name.trim().to_string(),
            });
        }
    }

    Ok(())
}

// =============================================================================
// Identifiers
// =============================================================================

/// Validates a UUID string.
///
/// ## Example
/// ```rust
/// use brew_core::validation::validate_uuid;
///
/// assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("not-a-uuid").is_err());
/// ```
pub fn validate_uuid(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "id".to_string(),
        });
    }

    uuid::Uuid::parse_str(id.trim()).map_err(|_| ValidationError::InvalidFormat {
        field: "id".to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn req(name: &str, units: i64) -> RecipeIngredient {
        RecipeIngredient::new(name, Quantity::from_units(units))
    }

    fn new_recipe(name: &str, cents: i64, reqs: Vec<RecipeIngredient>) -> NewRecipe {
        NewRecipe {
            name: name.to_string(),
            price: Money::from_cents(cents),
            recipe_ingredients: reqs,
        }
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_ingredient_name("Milk").is_ok());
        assert!(validate_ingredient_name("").is_err());
        assert!(validate_recipe_name(&"A".repeat(MAX_NAME_LENGTH)).is_ok());
        assert_eq!(
            validate_recipe_name(&"A".repeat(MAX_NAME_LENGTH + 1)),
            Err(ValidationError::TooLong {
                field: "name".to_string(),
                max: MAX_NAME_LENGTH,
            })
        );
    }

    #[test]
    fn test_validate_ingredient_amount() {
        assert!(validate_ingredient_amount(Quantity::zero()).is_ok());
        assert!(validate_ingredient_amount(Quantity::from_milli(1)).is_ok());
        assert!(validate_ingredient_amount(Quantity::from_milli(-1)).is_err());
    }

    #[test]
    fn test_validate_recipe_price() {
        assert!(validate_recipe_price(Money::from_cents(1)).is_ok());
        assert!(validate_recipe_price(Money::zero()).is_err());
        assert!(validate_recipe_price(Money::from_cents(-100)).is_err());
    }

    #[test]
    fn test_validate_count() {
        assert!(validate_count(1).is_ok());
        assert!(validate_count(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_count(0).is_err());
        assert!(validate_count(-1).is_err());
        assert!(validate_count(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_requirements() {
        assert!(validate_requirements(&[req("Milk", 100), req("Sugar", 10)]).is_ok());

        assert_eq!(
            validate_requirements(&[]),
            Err(ValidationError::Required {
                field: "ingredients".to_string(),
            })
        );
        assert!(matches!(
            validate_requirements(&[req("Milk", 0)]),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_requirements(&[req("Milk", 100), req("Milk ", 10)]),
            Err(ValidationError::Repeated { .. })
        ));
    }

    #[test]
    fn test_validate_new_recipe_against_stock() {
        let stock = vec![
            Ingredient::new("Milk", Quantity::from_units(500)),
            Ingredient::new("Coffee", Quantity::from_units(100)),
        ];

        let latte = new_recipe("Latte", 350, vec![req("Milk", 100), req("Coffee", 10)]);
        assert!(validate_new_recipe(&latte, Some(&stock)).is_ok());

        let mocha = new_recipe("Mocha", 400, vec![req("Milk", 100), req("Chocolate", 20)]);
        assert_eq!(
            validate_new_recipe(&mocha, Some(&stock)),
            Err(ValidationError::UnknownIngredient {
                name: "Chocolate".to_string(),
            })
        );

        let free = new_recipe("Water", 0, vec![req("Milk", 1)]);
        assert!(matches!(
            validate_new_recipe(&free, None),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("").is_err());
        assert!(validate_uuid("not-a-uuid").is_err());
        assert!(validate_uuid("123").is_err());
    }
}
