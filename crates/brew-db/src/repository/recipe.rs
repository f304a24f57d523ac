//! # Recipe Repository
//!
//! SQLite implementation of [`RecipeCatalog`].
//!
//! A recipe is one `recipes` row plus its `recipe_ingredients` rows, keyed
//! by `(recipe_id, position)` so requirements come back in entry order.
//! Create and update write both tables in a single transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use brew_core::{Money, NewRecipe, Quantity, Recipe, RecipeIngredient};
use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::store::RecipeCatalog;

#[derive(Debug, sqlx::FromRow)]
struct RecipeRow {
    id: String,
    name: String,
    price_cents: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct RequirementRow {
    recipe_id: String,
    name: String,
    amount_milli: i64,
}

impl RecipeRow {
    fn into_recipe(self, recipe_ingredients: Vec<RecipeIngredient>) -> Recipe {
        Recipe {
            id: self.id,
            name: self.name,
            price: Money::from_cents(self.price_cents),
            recipe_ingredients,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<RequirementRow> for RecipeIngredient {
    fn from(row: RequirementRow) -> Self {
        RecipeIngredient::new(row.name, Quantity::from_milli(row.amount_milli))
    }
}

/// Repository for recipe database operations.
#[derive(Debug, Clone)]
pub struct RecipeRepository {
    pool: SqlitePool,
}

impl RecipeRepository {
    /// Creates a new RecipeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecipeRepository { pool }
    }

    /// Recipes whose requirements mention the given ingredient name.
    ///
    /// Useful before deleting an ingredient: these recipes will stop being
    /// purchasable.
    pub async fn list_using_ingredient(&self, name: &str) -> DbResult<Vec<Recipe>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT r.id
            FROM recipes r
            INNER JOIN recipe_ingredients ri ON ri.recipe_id = r.id
            WHERE ri.name = ?1
            ORDER BY r.rowid
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        let mut recipes = Vec::with_capacity(ids.len());
        for id in ids {
            recipes.push(self.get(&id).await?);
        }
        Ok(recipes)
    }

    async fn requirements(&self, recipe_id: &str) -> DbResult<Vec<RecipeIngredient>> {
        let rows = sqlx::query_as::<_, RequirementRow>(
            r#"
            SELECT recipe_id, name, amount_milli
            FROM recipe_ingredients
            WHERE recipe_id = ?1
            ORDER BY position
            "#,
        )
        .bind(recipe_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecipeIngredient::from).collect())
    }

    async fn insert_requirements(
        tx: &mut Transaction<'_, Sqlite>,
        recipe_id: &str,
        requirements: &[RecipeIngredient],
    ) -> DbResult<()> {
        for (position, requirement) in requirements.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO recipe_ingredients (recipe_id, position, name, amount_milli)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )
            .bind(recipe_id)
            .bind(position as i64)
            .bind(requirement.name.trim())
            .bind(requirement.amount.milli())
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeCatalog for RecipeRepository {
    async fn list(&self) -> DbResult<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, RecipeRow>(
            "SELECT id, name, price_cents, created_at, updated_at FROM recipes ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        let requirement_rows = sqlx::query_as::<_, RequirementRow>(
            r#"
            SELECT recipe_id, name, amount_milli
            FROM recipe_ingredients
            ORDER BY recipe_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_recipe: HashMap<String, Vec<RecipeIngredient>> = HashMap::new();
        for row in requirement_rows {
            by_recipe.entry(row.recipe_id.clone()).or_default().push(row.into());
        }

        debug!(count = rows.len(), "Listed recipes");
        Ok(rows
            .into_iter()
            .map(|row| {
                let requirements = by_recipe.remove(&row.id).unwrap_or_default();
                row.into_recipe(requirements)
            })
            .collect())
    }

    async fn get(&self, id: &str) -> DbResult<Recipe> {
        let row = sqlx::query_as::<_, RecipeRow>(
            "SELECT id, name, price_cents, created_at, updated_at FROM recipes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Recipe", id))?;

        let requirements = self.requirements(id).await?;
        Ok(row.into_recipe(requirements))
    }

    async fn create(&self, recipe: &NewRecipe) -> DbResult<Recipe> {
        debug!(name = %recipe.name, price = %recipe.price, "Inserting recipe");

        let now = Utc::now();
        let created = Recipe {
            id: Uuid::new_v4().to_string(),
            name: recipe.name.clone(),
            price: recipe.price,
            recipe_ingredients: recipe
                .recipe_ingredients
                .iter()
                .map(|r| RecipeIngredient::new(r.name.trim(), r.amount))
                .collect(),
            created_at: now,
            updated_at: now,
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO recipes (id, name, price_cents, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&created.id)
        .bind(&created.name)
        .bind(created.price.cents())
        .bind(created.created_at)
        .bind(created.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_conflict_value(&recipe.name))?;

        Self::insert_requirements(&mut tx, &created.id, &created.recipe_ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        Ok(created)
    }

    async fn update(&self, id: &str, recipe: &NewRecipe) -> DbResult<Recipe> {
        debug!(id = %id, name = %recipe.name, "Updating recipe");

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE recipes
            SET name = ?2, price_cents = ?3, updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&recipe.name)
        .bind(recipe.price.cents())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::from(e).with_conflict_value(&recipe.name))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        Self::insert_requirements(&mut tx, id, &recipe.recipe_ingredients).await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        self.get(id).await
    }

    async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting recipe");

        // recipe_ingredients rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM recipes WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Recipe", id));
        }

        Ok(())
    }

    async fn delete_all(&self) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM recipes").execute(&self.pool).await?;

        debug!(removed = result.rows_affected(), "Deleted all recipes");
        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
