//! # Store Traits
//!
//! The two collaborators the purchase engine talks to.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Collaborator Interfaces                              │
//! │                                                                         │
//! │        IngredientStore                      RecipeCatalog               │
//! │        ───────────────                      ─────────────               │
//! │        list / get                           list / get                  │
//! │        create / update_amount / rename      create / update             │
//! │        delete / delete_all                  delete / delete_all         │
//! │        apply_deductions  ◄── atomic batch                               │
//! │              │                                    │                     │
//! │     ┌────────┴─────────┐                ┌─────────┴────────┐            │
//! │     ▼                  ▼                ▼                  ▼            │
//! │  IngredientRepository  MemoryStore   RecipeRepository   MemoryStore     │
//! │  (SQLite)              (tests)       (SQLite)           (tests)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation returns the fresh stored record so callers never have to
//! reload a whole collection to see the effect of their own write.

use async_trait::async_trait;
use brew_core::{Ingredient, NewRecipe, Quantity, Recipe, StockDeduction};

use crate::error::DbResult;

/// Inventory of named ingredients with on-hand amounts.
#[async_trait]
pub trait IngredientStore: Send + Sync {
    /// All ingredients, in creation order.
    async fn list(&self) -> DbResult<Vec<Ingredient>>;

    /// One ingredient, or `DbError::NotFound`.
    async fn get(&self, id: &str) -> DbResult<Ingredient>;

    /// Adds an ingredient. `DbError::Conflict` if the name is taken.
    async fn create(&self, name: &str, amount: Quantity) -> DbResult<Ingredient>;

    /// Overwrites the on-hand amount. `DbError::NotFound` for unknown ids.
    async fn update_amount(&self, id: &str, amount: Quantity) -> DbResult<Ingredient>;

    /// Renames an ingredient and rewrites every recipe requirement that
    /// referenced the old name, in one write.
    ///
    /// `DbError::Conflict` if another ingredient has the name, or if a
    /// recipe already requires both the old and the new name.
    async fn rename(&self, id: &str, name: &str) -> DbResult<Ingredient>;

    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Removes every ingredient and returns how many were removed.
    async fn delete_all(&self) -> DbResult<u64>;

    /// Applies a settlement's deduction plan as one all-or-nothing batch.
    ///
    /// Each deduction only applies if the ingredient still holds the
    /// `available` amount the plan was computed from. If any deduction
    /// cannot be applied, none are, and the error is returned.
    ///
    /// Returns the updated ingredients in plan order.
    async fn apply_deductions(&self, plan: &[StockDeduction]) -> DbResult<Vec<Ingredient>>;
}

/// Catalog of priced recipes.
#[async_trait]
pub trait RecipeCatalog: Send + Sync {
    /// All recipes, in creation order, requirements in entry order.
    async fn list(&self) -> DbResult<Vec<Recipe>>;

    /// One recipe, or `DbError::NotFound`.
    async fn get(&self, id: &str) -> DbResult<Recipe>;

    /// Adds a recipe. `DbError::Conflict` if the name is taken.
    async fn create(&self, recipe: &NewRecipe) -> DbResult<Recipe>;

    /// Replaces name, price and requirements of an existing recipe.
    async fn update(&self, id: &str, recipe: &NewRecipe) -> DbResult<Recipe>;

    async fn delete(&self, id: &str) -> DbResult<()>;

    /// Removes every recipe and returns how many were removed.
    async fn delete_all(&self) -> DbResult<u64>;
}
