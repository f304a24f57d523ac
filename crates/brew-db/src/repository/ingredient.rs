//! # Ingredient Repository
//!
//! SQLite implementation of [`IngredientStore`].
//!
//! ## Atomic Deduction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    apply_deductions(plan)                               │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE ingredients SET amount_milli = remaining                      │
//! │     WHERE id = ? AND amount_milli = available    ── 0 rows? ─┐          │
//! │    UPDATE ... (next deduction)                   ── 0 rows? ─┤          │
//! │    UPDATE ... (next deduction)                   ── 0 rows? ─┤          │
//! │  COMMIT                                                      ▼          │
//! │                                                  ROLLBACK, nothing      │
//! │                                                  written                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `amount_milli = available` guard makes the write conditional on the
//! snapshot the plan was computed from, so a row that was deleted or
//! restocked in between aborts the whole batch.

use async_trait::async_trait;
use brew_core::{Ingredient, Quantity, StockDeduction};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::IngredientStore;

/// Raw `ingredients` row.
#[derive(Debug, sqlx::FromRow)]
struct IngredientRow {
    id: String,
    name: String,
    amount_milli: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Ingredient {
            id: row.id,
            name: row.name,
            amount: Quantity::from_milli(row.amount_milli),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_INGREDIENT: &str = r#"
    SELECT id, name, amount_milli, created_at, updated_at
    FROM ingredients
"#;

/// Repository for ingredient database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.ingredients();
/// let milk = repo.create("Milk", Quantity::from_units(500)).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct IngredientRepository {
    pool: SqlitePool,
}

impl IngredientRepository {
    /// Creates a new IngredientRepository.
    pub fn new(pool: SqlitePool) -> Self {
        IngredientRepository { pool }
    }

    /// Looks an ingredient up by its unique name.
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Ingredient>> {
        let row = sqlx::query_as::<_, IngredientRow>(&format!("{SELECT_INGREDIENT} WHERE name = ?1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Ingredient::from))
    }

    /// Counts ingredients (for diagnostics and the seed binary).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ingredients")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[async_trait]
impl IngredientStore for IngredientRepository {
    async fn list(&self) -> DbResult<Vec<Ingredient>> {
        let rows = sqlx::query_as::<_, IngredientRow>(&format!("{SELECT_INGREDIENT} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed ingredients");
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn get(&self, id: &str) -> DbResult<Ingredient> {
        sqlx::query_as::<_, IngredientRow>(&format!("{SELECT_INGREDIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Ingredient::from)
            .ok_or_else(|| DbError::not_found("Ingredient", id))
    }

    async fn create(&self, name: &str, amount: Quantity) -> DbResult<Ingredient> {
        debug!(name = %name, amount = %amount, "Inserting ingredient");

        let now = Utc::now();
        let ingredient = Ingredient {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            amount,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO ingredients (id, name, amount_milli, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&ingredient.id)
        .bind(&ingredient.name)
        .bind(ingredient.amount.milli())
        .bind(ingredient.created_at)
        .bind(ingredient.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_conflict_value(name))?;

        Ok(ingredient)
    }

    async fn update_amount(&self, id: &str, amount: Quantity) -> DbResult<Ingredient> {
        debug!(id = %id, amount = %amount, "Updating ingredient amount");

        let result = sqlx::query(
            r#"
            UPDATE ingredients
            SET amount_milli = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(amount.milli())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", id));
        }

        self.get(id).await
    }

    async fn rename(&self, id: &str, name: &str) -> DbResult<Ingredient> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let old_name: String = sqlx::query_scalar("SELECT name FROM ingredients WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Ingredient", id))?;

        if old_name == name {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return self.get(id).await;
        }

        // A recipe listing both names would end up with a repeated requirement
        let clashes: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM recipe_ingredients held
            JOIN recipe_ingredients wanted ON wanted.recipe_id = held.recipe_id
            WHERE held.name = ?1 AND wanted.name = ?2
            "#,
        )
        .bind(&old_name)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        if clashes > 0 {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            return Err(DbError::conflict("recipe_ingredients.name", name));
        }

        sqlx::query("UPDATE ingredients SET name = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::from(e).with_conflict_value(name))?;

        let rewritten = sqlx::query("UPDATE recipe_ingredients SET name = ?2 WHERE name = ?1")
            .bind(&old_name)
            .bind(name)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let row = sqlx::query_as::<_, IngredientRow>(&format!("{SELECT_INGREDIENT} WHERE id = ?1"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(from = %old_name, to = %name, requirements = rewritten, "Renamed ingredient");
        Ok(Ingredient::from(row))
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting ingredient");

        let result = sqlx::query("DELETE FROM ingredients WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Ingredient", id));
        }

        Ok(())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM ingredients").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Deleted all ingredients");
        Ok(result.rows_affected())
    }

    async fn apply_deductions(&self, plan: &[StockDeduction]) -> DbResult<Vec<Ingredient>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let now = Utc::now();
        let mut updated = Vec::with_capacity(plan.len());

        for deduction in plan {
            debug!(
                ingredient = %deduction.name,
                available = %deduction.available,
                needed = %deduction.needed,
                "Deducting stock"
            );

            let result = sqlx::query(
                r#"
                UPDATE ingredients
                SET amount_milli = ?2, updated_at = ?3
                WHERE id = ?1 AND amount_milli = ?4
                "#,
            )
            .bind(&deduction.ingredient_id)
            .bind(deduction.remaining.milli())
            .bind(now)
            .bind(deduction.available.milli())
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                return Err(DbError::TransactionFailed(format!(
                    "ingredient '{}' changed or was removed during checkout",
                    deduction.name
                )));
            }

            let row = sqlx::query_as::<_, IngredientRow>(&format!("{SELECT_INGREDIENT} WHERE id = ?1"))
                .bind(&deduction.ingredient_id)
                .fetch_one(&mut *tx)
                .await?;
            updated.push(Ingredient::from(row));
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(ingredients = updated.len(), "Stock deductions committed");
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
