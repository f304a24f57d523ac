//! # In-Memory Store
//!
//! A [`IngredientStore`] + [`RecipeCatalog`] kept in process memory.
//!
//! Used by tests and by callers that want the purchase flow without a
//! database file. It follows the same rules as the SQLite schema (unique
//! names, non-negative amounts, positive prices) so both implementations
//! are interchangeable behind the traits.
//!
//! ## Staged Commit
//! ```text
//!   apply_deductions(plan)
//!        │
//!        ▼
//!   staged = ingredients.clone()
//!        │
//!        ├── write 1 on staged ──┐
//!        ├── write 2 on staged ──┼── any failure: drop staged, return Err
//!        ├── write 3 on staged ──┘
//!        ▼
//!   ingredients = staged          (single swap under the write lock)
//! ```
//!
//! [`MemoryStore::fail_on_write`] makes the N-th write of the next batch
//! fail, to exercise the rollback path.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use brew_core::{Ingredient, NewRecipe, Quantity, Recipe, RecipeIngredient, StockDeduction};
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::store::{IngredientStore, RecipeCatalog};

#[derive(Debug, Default)]
struct MemoryState {
    ingredients: Vec<Ingredient>,
    recipes: Vec<Recipe>,
}

/// Shared in-memory ingredient store and recipe catalog.
///
/// Clones share the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    /// 1-based index of the write to fail in the next batch; 0 = never.
    fail_on_write: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Makes the `n`-th write (1-based) of the next `apply_deductions` batch
    /// fail. Fires once.
    pub fn fail_on_write(&self, n: usize) {
        self.fail_on_write.store(n, Ordering::SeqCst);
    }

    fn check_amount(amount: Quantity) -> DbResult<()> {
        if amount.is_negative() {
            return Err(DbError::QueryFailed(
                "CHECK constraint failed: amount_milli >= 0".to_string(),
            ));
        }
        Ok(())
    }

    fn check_recipe(recipe: &NewRecipe) -> DbResult<()> {
        if !recipe.price.is_positive() {
            return Err(DbError::QueryFailed(
                "CHECK constraint failed: price_cents > 0".to_string(),
            ));
        }
        if recipe.recipe_ingredients.iter().any(|r| !r.amount.is_positive()) {
            return Err(DbError::QueryFailed(
                "CHECK constraint failed: amount_milli > 0".to_string(),
            ));
        }
        Ok(())
    }

    fn trimmed_requirements(recipe: &NewRecipe) -> Vec<RecipeIngredient> {
        recipe
            .recipe_ingredients
            .iter()
            .map(|r| RecipeIngredient::new(r.name.trim(), r.amount))
            .collect()
    }
}

// =============================================================================
// IngredientStore
// =============================================================================

#[async_trait]
impl IngredientStore for MemoryStore {
    async fn list(&self) -> DbResult<Vec<Ingredient>> {
        Ok(self.state.read().await.ingredients.clone())
    }

    async fn get(&self, id: &str) -> DbResult<Ingredient> {
        self.state
            .read()
            .await
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    async fn create(&self, name: &str, amount: Quantity) -> DbResult<Ingredient> {
        Self::check_amount(amount)?;

        let mut state = self.state.write().await;
        if state.ingredients.iter().any(|i| i.name == name) {
            return Err(DbError::conflict("ingredients.name", name));
        }

        let ingredient = Ingredient::new(name, amount);
        state.ingredients.push(ingredient.clone());

        debug!(name = %name, amount = %amount, "Inserted ingredient");
        Ok(ingredient)
    }

    async fn update_amount(&self, id: &str, amount: Quantity) -> DbResult<Ingredient> {
        Self::check_amount(amount)?;

        let mut state = self.state.write().await;
        let ingredient = state
            .ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DbError::not_found("Ingredient", id))?;

        ingredient.amount = amount;
        ingredient.updated_at = Utc::now();
        Ok(ingredient.clone())
    }

    async fn rename(&self, id: &str, name: &str) -> DbResult<Ingredient> {
        let mut state = self.state.write().await;
        if state.ingredients.iter().any(|i| i.name == name && i.id != id) {
            return Err(DbError::conflict("ingredients.name", name));
        }

        let old_name = state
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.name.clone())
            .ok_or_else(|| DbError::not_found("Ingredient", id))?;

        if old_name != name {
            let clash = state.recipes.iter().any(|r| {
                r.recipe_ingredients.iter().any(|req| req.name == old_name)
                    && r.recipe_ingredients.iter().any(|req| req.name == name)
            });
            if clash {
                return Err(DbError::conflict("recipe_ingredients.name", name));
            }

            for requirement in state
                .recipes
                .iter_mut()
                .flat_map(|r| r.recipe_ingredients.iter_mut())
                .filter(|req| req.name == old_name)
            {
                requirement.name = name.to_string();
            }
        }

        let ingredient = state
            .ingredients
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| DbError::not_found("Ingredient", id))?;
        ingredient.name = name.to_string();
        ingredient.updated_at = Utc::now();

        debug!(from = %old_name, to = %name, "Renamed ingredient");
        Ok(ingredient.clone())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        let before = state.ingredients.len();
        state.ingredients.retain(|i| i.id != id);

        if state.ingredients.len() == before {
            return Err(DbError::not_found("Ingredient", id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.ingredients.len() as u64;
        state.ingredients.clear();
        Ok(removed)
    }

    async fn apply_deductions(&self, plan: &[StockDeduction]) -> DbResult<Vec<Ingredient>> {
        let mut state = self.state.write().await;
        let mut staged = state.ingredients.clone();
        let fail_at = self.fail_on_write.swap(0, Ordering::SeqCst);

        let now = Utc::now();
        let mut updated = Vec::with_capacity(plan.len());

        for (index, deduction) in plan.iter().enumerate() {
            if fail_at == index + 1 {
                return Err(DbError::TransactionFailed(format!(
                    "write {} of {} failed",
                    index + 1,
                    plan.len()
                )));
            }

            let ingredient = staged
                .iter_mut()
                .find(|i| i.id == deduction.ingredient_id && i.amount == deduction.available)
                .ok_or_else(|| {
                    DbError::TransactionFailed(format!(
                        "ingredient '{}' changed or was removed during checkout",
                        deduction.name
                    ))
                })?;

            ingredient.amount = deduction.remaining;
            ingredient.updated_at = now;
            updated.push(ingredient.clone());
        }

        state.ingredients = staged;

        info!(ingredients = updated.len(), "Stock deductions committed");
        Ok(updated)
    }
}

// =============================================================================
// RecipeCatalog
// =============================================================================

#[async_trait]
impl RecipeCatalog for MemoryStore {
    async fn list(&self) -> DbResult<Vec<Recipe>> {
        Ok(self.state.read().await.recipes.clone())
    }

    async fn get(&self, id: &str) -> DbResult<Recipe> {
        self.state
            .read()
            .await
            .recipes
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Recipe", id))
    }

    async fn create(&self, recipe: &NewRecipe) -> DbResult<Recipe> {
        Self::check_recipe(recipe)?;

        let mut state = self.state.write().await;
        if state.recipes.iter().any(|r| r.name == recipe.name) {
            return Err(DbError::conflict("recipes.name", &recipe.name));
        }

        let created = Recipe::new(
            recipe.name.clone(),
            recipe.price,
            Self::trimmed_requirements(recipe),
        );
        state.recipes.push(created.clone());

        debug!(name = %recipe.name, "Inserted recipe");
        Ok(created)
    }

    async fn update(&self, id: &str, recipe: &NewRecipe) -> DbResult<Recipe> {
        Self::check_recipe(recipe)?;

        let mut state = self.state.write().await;
        if state.recipes.iter().any(|r| r.name == recipe.name && r.id != id) {
            return Err(DbError::conflict("recipes.name", &recipe.name));
        }

        let existing = state
            .recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DbError::not_found("Recipe", id))?;

        existing.name = recipe.name.clone();
        existing.price = recipe.price;
        existing.recipe_ingredients = Self::trimmed_requirements(recipe);
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        let mut state = self.state.write().await;
        let before = state.recipes.len();
        state.recipes.retain(|r| r.id != id);

        if state.recipes.len() == before {
            return Err(DbError::not_found("Recipe", id));
        }
        Ok(())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.recipes.len() as u64;
        state.recipes.clear();
        Ok(removed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
