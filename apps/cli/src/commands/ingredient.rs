//! `brew ingredient ...`

use brew_core::validation::{validate_ingredient_amount, validate_ingredient_name, validate_uuid};
use brew_db::{IngredientStore, RecipeCatalog};
use serde_json::json;
use tracing::info;

use crate::cli::IngredientCommand;
use crate::output::{Formatter, Output};
use crate::report::Refused;

pub async fn run<S, C>(
    stock: &S,
    catalog: &C,
    fmt: &Formatter,
    command: IngredientCommand,
) -> anyhow::Result<Output>
where
    S: IngredientStore,
    C: RecipeCatalog,
{
    match command {
        IngredientCommand::List => {
            let all = stock.list().await?;
            Output::new(&all, fmt.ingredients(&all))
        }

        IngredientCommand::Show { id } => {
            validate_uuid(&id)?;
            let ingredient = stock.get(&id).await?;
            Output::new(&ingredient, fmt.ingredient(&ingredient))
        }

        IngredientCommand::Add { name, amount } => {
            validate_ingredient_name(&name)?;
            validate_ingredient_amount(amount)?;

            let created = stock.create(name.trim(), amount).await?;
            info!(id = %created.id, name = %created.name, "Ingredient added");
            Output::new(&created, format!("Added {}", fmt.ingredient(&created)))
        }

        IngredientCommand::Set { id, amount } => {
            validate_uuid(&id)?;
            validate_ingredient_amount(amount)?;

            let updated = stock.update_amount(&id, amount).await?;
            info!(id = %updated.id, amount = %updated.amount, "Ingredient stock set");
            Output::new(&updated, format!("Updated {}", fmt.ingredient(&updated)))
        }

        IngredientCommand::Rename { id, name } => {
            validate_uuid(&id)?;
            validate_ingredient_name(&name)?;

            let before = stock.get(&id).await?;
            let renamed = stock.rename(&id, name.trim()).await?;
            info!(id = %renamed.id, from = %before.name, to = %renamed.name, "Ingredient renamed");

            let updated: Vec<String> = catalog
                .list()
                .await?
                .into_iter()
                .filter(|r| {
                    before.name != renamed.name
                        && r.recipe_ingredients.iter().any(|req| req.name == renamed.name)
                })
                .map(|r| r.name)
                .collect();

            let mut text = format!("Renamed {} to {}", before.name, renamed.name);
            if !updated.is_empty() {
                text.push_str(&format!("\nRecipes now using the new name: {}", updated.join(", ")));
            }
            Output::new(&json!({ "renamed": renamed, "updatedRecipes": updated }), text)
        }

        IngredientCommand::Remove { id } => {
            validate_uuid(&id)?;
            let removed = stock.get(&id).await?;
            stock.delete(&id).await?;
            info!(id = %removed.id, name = %removed.name, "Ingredient removed");

            // Recipes keep their requirement by name and stop being sellable
            let orphaned: Vec<String> = catalog
                .list()
                .await?
                .into_iter()
                .filter(|r| r.recipe_ingredients.iter().any(|req| req.name == removed.name))
                .map(|r| r.name)
                .collect();

            let mut text = format!("Removed {}", removed.name);
            if !orphaned.is_empty() {
                text.push_str(&format!(
                    "\nThese recipes now need a missing ingredient: {}",
                    orphaned.join(", ")
                ));
            }
            Output::new(&json!({ "removed": removed, "affectedRecipes": orphaned }), text)
        }

        IngredientCommand::Clear { yes } => {
            if !yes {
                return Err(Refused("delete every ingredient").into());
            }
            let deleted = stock.delete_all().await?;
            info!(deleted, "Ingredients cleared");
            Output::new(&json!({ "deleted": deleted }), format!("Removed {deleted} ingredients"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brew_core::{generate_id, Money, NewRecipe, Quantity, RecipeIngredient, ValidationError};
    use brew_db::{DbError, MemoryStore};

    fn fmt() -> Formatter {
        Formatter::new("$")
    }

    #[tokio::test]
    async fn test_add_trims_name_and_lists() {
        let store = MemoryStore::new();

        let added = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Add {
                name: "  Milk ".to_string(),
                amount: Quantity::from_units(500),
            },
        )
        .await
        .unwrap();
        assert_eq!(added.json()["name"], "Milk");

        let listed = run(&store, &store, &fmt(), IngredientCommand::List).await.unwrap();
        assert_eq!(listed.json().as_array().unwrap().len(), 1);
        assert!(listed.text().contains("Milk"));
    }

    #[tokio::test]
    async fn test_add_rejects_blank_name() {
        let store = MemoryStore::new();
        let err = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Add {
                name: "   ".to_string(),
                amount: Quantity::from_units(1),
            },
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert!(IngredientStore::list(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_rejects_negative_amount() {
        let store = MemoryStore::new();
        let milk = IngredientStore::create(&store, "Milk", Quantity::from_units(5)).await.unwrap();

        let err = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Set {
                id: milk.id.clone(),
                amount: Quantity::from_units(-1),
            },
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert_eq!(IngredientStore::get(&store, &milk.id).await.unwrap().amount, Quantity::from_units(5));
    }

    #[tokio::test]
    async fn test_show_unknown_id_is_not_found() {
        let store = MemoryStore::new();
        let err = run(&store, &store, &fmt(), IngredientCommand::Show { id: generate_id() })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DbError>(), Some(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_malformed_id_is_rejected_before_lookup() {
        let store = MemoryStore::new();
        let err = run(&store, &store, &fmt(), IngredientCommand::Show { id: "nope".to_string() })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_remove_reports_affected_recipes() {
        let store = MemoryStore::new();
        let milk = IngredientStore::create(&store, "Milk", Quantity::from_units(5)).await.unwrap();
        RecipeCatalog::create(
            &store,
            &NewRecipe {
                name: "Latte".to_string(),
                price: Money::from_cents(350),
                recipe_ingredients: vec![RecipeIngredient::new("Milk", Quantity::from_units(1))],
            },
        )
        .await
        .unwrap();

        let output = run(&store, &store, &fmt(), IngredientCommand::Remove { id: milk.id })
            .await
            .unwrap();

        assert_eq!(output.json()["affectedRecipes"][0], "Latte");
        assert!(output.text().contains("missing ingredient: Latte"));
    }

    async fn latte_with_milk(store: &MemoryStore) -> String {
        let milk = IngredientStore::create(store, "Milk", Quantity::from_units(5)).await.unwrap();
        IngredientStore::create(store, "Coffee", Quantity::from_units(5)).await.unwrap();
        RecipeCatalog::create(
            store,
            &NewRecipe {
                name: "Latte".to_string(),
                price: Money::from_cents(350),
                recipe_ingredients: vec![RecipeIngredient::new("Milk", Quantity::from_units(1))],
            },
        )
        .await
        .unwrap();
        milk.id
    }

    #[tokio::test]
    async fn test_rename_carries_recipes_along() {
        let store = MemoryStore::new();
        let milk = latte_with_milk(&store).await;

        let output = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Rename {
                id: milk,
                name: " Oat Milk ".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(output.json()["renamed"]["name"], "Oat Milk");
        assert_eq!(output.json()["updatedRecipes"][0], "Latte");
        assert!(output.text().contains("Renamed Milk to Oat Milk"));

        let latte = RecipeCatalog::list(&store).await.unwrap().remove(0);
        assert_eq!(latte.recipe_ingredients[0].name, "Oat Milk");
        assert!(latte.unpurchasable_reason().is_none());
    }

    #[tokio::test]
    async fn test_rename_to_existing_name_is_conflict() {
        let store = MemoryStore::new();
        let milk = latte_with_milk(&store).await;

        let err = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Rename {
                id: milk.clone(),
                name: "Coffee".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err.downcast_ref::<DbError>(), Some(DbError::Conflict { .. })));
        assert_eq!(IngredientStore::get(&store, &milk).await.unwrap().name, "Milk");
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_name() {
        let store = MemoryStore::new();
        let milk = latte_with_milk(&store).await;

        let err = run(
            &store,
            &store,
            &fmt(),
            IngredientCommand::Rename {
                id: milk,
                name: " ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
    }

    #[tokio::test]
    async fn test_clear_needs_confirmation() {
        let store = MemoryStore::new();
        IngredientStore::create(&store, "Milk", Quantity::from_units(5)).await.unwrap();

        let err = run(&store, &store, &fmt(), IngredientCommand::Clear { yes: false })
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<Refused>().is_some());
        assert_eq!(IngredientStore::list(&store).await.unwrap().len(), 1);

        let output = run(&store, &store, &fmt(), IngredientCommand::Clear { yes: true })
            .await
            .unwrap();
        assert_eq!(output.json()["deleted"], 1);
    }
}
