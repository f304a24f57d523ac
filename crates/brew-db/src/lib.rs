//! # brew-db: Persistence for Brew Counter
//!
//! The ingredient store and recipe catalog the purchase engine runs
//! against, plus the checkout service that ties them to `brew-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Brew Counter Data Flow                             │
//! │                                                                         │
//! │  `brew purchase --item <id>=2 --pay 10`                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     brew-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────┐   ┌──────────────────┐   ┌──────────────┐    │   │
//! │  │   │  Checkout   │──►│  store traits    │   │  Migrations  │    │   │
//! │  │   │ quote / pay │   │ IngredientStore  │   │  (embedded)  │    │   │
//! │  │   └──────┬──────┘   │ RecipeCatalog    │   └──────────────┘    │   │
//! │  │          │          └───────┬──────────┘                        │   │
//! │  │          │          ┌───────┴───────────┐                       │   │
//! │  │          │          ▼                   ▼                       │   │
//! │  │          │   repository (SQLite)   MemoryStore                  │   │
//! │  └──────────┼──────────────────────────────────────────────────────┘   │
//! │             ▼                                                           │
//! │       brew-core: quote → check_sufficiency → settle                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`store`] - `IngredientStore` and `RecipeCatalog` traits
//! - [`repository`] - SQLite implementations
//! - [`memory`] - In-memory implementation with fault injection
//! - [`checkout`] - Quote and pay against live stock
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brew_db::{Database, DbConfig, IngredientStore};
//!
//! let db = Database::new(DbConfig::new("brew.db")).await?;
//! db.ingredients().create("Milk", Quantity::from_units(500)).await?;
//!
//! let checkout = db.checkout();
//! let quote = checkout.quote(&selections).await?;
//! let receipt = checkout.pay(&quote, Some(Money::from_cents(1000))).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{Checkout, CheckoutError};
pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use store::{IngredientStore, RecipeCatalog};

pub use repository::ingredient::IngredientRepository;
pub use repository::recipe::RecipeRepository;
