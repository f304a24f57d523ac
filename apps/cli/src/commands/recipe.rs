//! `brew recipe ...`

use brew_core::validation::{validate_new_recipe, validate_uuid};
use brew_core::{NewRecipe, RecipeIngredient};
use brew_db::{IngredientStore, RecipeCatalog};
use serde_json::json;
use tracing::info;

use crate::cli::RecipeCommand;
use crate::output::{Formatter, Output};
use crate::report::Refused;

fn trimmed(requirements: Vec<RecipeIngredient>) -> Vec<RecipeIngredient> {
    requirements
        .into_iter()
        .map(|r| RecipeIngredient::new(r.name.trim(), r.amount))
        .collect()
}

pub async fn run<S, C>(
    stock: &S,
    catalog: &C,
    fmt: &Formatter,
    command: RecipeCommand,
) -> anyhow::Result<Output>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    match command {
        RecipeCommand::List => {
            let all = catalog.list().await?;
            Output::new(&all, fmt.recipes(&all))
        }

        RecipeCommand::Show { id } => {
            validate_uuid(&id)?;
            let recipe = catalog.get(&id).await?;
            Output::new(&recipe, fmt.recipe_detail(&recipe))
        }

        RecipeCommand::Add { name, price, requires } => {
            let recipe = NewRecipe {
                name: name.trim().to_string(),
                price,
                recipe_ingredients: trimmed(requires),
            };
            let inventory = stock.list().await?;
            validate_new_recipe(&recipe, Some(&inventory))?;

            let created = catalog.create(&recipe).await?;
            info!(id = %created.id, name = %created.name, "Recipe added");
            Output::new(&created, format!("Added {}", fmt.recipe_detail(&created)))
        }

        RecipeCommand::Update { id, name, price, requires } => {
            validate_uuid(&id)?;
            let existing = catalog.get(&id).await?;

            let recipe = NewRecipe {
                name: name.map_or(existing.name, |n| n.trim().to_string()),
                price: price.unwrap_or(existing.price),
                recipe_ingredients: if requires.is_empty() {
                    existing.recipe_ingredients
                } else {
                    trimmed(requires)
                },
            };
            let inventory = stock.list().await?;
            validate_new_recipe(&recipe, Some(&inventory))?;

            let updated = catalog.update(&id, &recipe).await?;
            info!(id = %updated.id, name = %updated.name, "Recipe updated");
            Output::new(&updated, format!("Updated {}", fmt.recipe_detail(&updated)))
        }

        RecipeCommand::Remove { id } => {
            validate_uuid(&id)?;
            let removed = catalog.get(&id).await?;
            catalog.delete(&id).await?;
            info!(id = %removed.id, name = %removed.name, "Recipe removed");
            Output::new(&removed, format!("Removed {}", removed.name))
        }

        RecipeCommand::Clear { yes } => {
            if !yes {
                return Err(Refused("delete every recipe").into());
            }
            let deleted = catalog.delete_all().await?;
            info!(deleted, "Recipes cleared");
            Output::new(&json!({ "deleted": deleted }), format!("Removed {deleted} recipes"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{Money, Quantity, ValidationError};
    use brew_db::{DbError, MemoryStore};

    fn fmt() -> Formatter {
        Formatter::new("$")
    }

    fn req(name: &str, units: i64) -> RecipeIngredient {
        RecipeIngredient::new(name, Quantity::from_units(units))
    }

    async fn with_stock() -> MemoryStore {
        let store = MemoryStore::new();
        IngredientStore::create(&store, "Milk", Quantity::from_units(500)).await.unwrap();
        IngredientStore::create(&store, "Coffee", Quantity::from_units(100)).await.unwrap();
        store
    }

    fn add(name: &str, cents: i64, requires: Vec<RecipeIngredient>) -> RecipeCommand {
        RecipeCommand::Add {
            name: name.to_string(),
            price: Money::from_cents(cents),
            requires,
        }
    }

    #[tokio::test]
    async fn test_add_keeps_requirement_order() {
        let store = with_stock().await;

        let output = run(&store, &store, &fmt(), add(" Latte ", 350, vec![req(" Milk", 100), req("Coffee", 18)]))
            .await
            .unwrap();

        assert_eq!(output.json()["name"], "Latte");
        assert_eq!(output.json()["recipeIngredients"][0]["name"], "Milk");
        assert_eq!(output.json()["recipeIngredients"][1]["name"], "Coffee");
        assert!(output.text().contains("Coffee"));
    }

    #[tokio::test]
    async fn test_add_rejects_ingredient_not_in_inventory() {
        let store = with_stock().await;

        let err = run(&store, &store, &fmt(), add("Mocha", 400, vec![req("Chocolate", 20)]))
            .await
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::UnknownIngredient { .. })
        ));
        assert!(RecipeCatalog::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_requires_requirements_and_price() {
        let store = with_stock().await;

        let err = run(&store, &store, &fmt(), add("Water", 100, vec![])).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());

        let err = run(&store, &store, &fmt(), add("Free", 0, vec![req("Milk", 1)]))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_update_keeps_omitted_fields() {
        let store = with_stock().await;
        let latte = RecipeCatalog::create(
            &store,
            &NewRecipe {
                name: "Latte".to_string(),
                price: Money::from_cents(350),
                recipe_ingredients: vec![req("Milk", 100), req("Coffee", 18)],
            },
        )
        .await
        .unwrap();

        let output = run(
            &store,
            &store,
            &fmt(),
            RecipeCommand::Update {
                id: latte.id.clone(),
                name: None,
                price: Some(Money::from_cents(375)),
                requires: vec![],
            },
        )
        .await
        .unwrap();
        assert_eq!(output.json()["name"], "Latte");

        let stored = RecipeCatalog::get(&store, &latte.id).await.unwrap();
        assert_eq!(stored.price, Money::from_cents(375));
        assert_eq!(stored.recipe_ingredients, latte.recipe_ingredients);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_a_conflict() {
        let store = with_stock().await;
        run(&store, &store, &fmt(), add("Latte", 350, vec![req("Milk", 100)]))
            .await
            .unwrap();

        let err = run(&store, &store, &fmt(), add("Latte", 300, vec![req("Milk", 50)]))
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DbError>(), Some(DbError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_clear_needs_confirmation() {
        let store = with_stock().await;
        let err = run(&store, &store, &fmt(), RecipeCommand::Clear { yes: false })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<Refused>().is_some());
    }
}
