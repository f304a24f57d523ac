//! # Repository Module
//!
//! SQLite implementations of the store traits.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  `brew` CLI / Checkout                                                 │
//! │       │                                                                 │
//! │       │  db.ingredients().list()                                       │
//! │       ▼                                                                 │
//! │  IngredientRepository ── impl IngredientStore                          │
//! │  RecipeRepository     ── impl RecipeCatalog                            │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite (ingredients, recipes, recipe_ingredients)                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`IngredientRepository`](ingredient::IngredientRepository) - inventory and atomic deduction
//! - [`RecipeRepository`](recipe::RecipeRepository) - recipe catalog

pub mod ingredient;
pub mod recipe;
