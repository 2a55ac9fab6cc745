use anyhow::Context;
use async_trait::async_trait;

use crate::{auth::scope::OwnerScope, db::PgStore};

pub use super::repo_types::{NewRecipe, Recipe, RecipeChanges};

const RECIPE_COLUMNS: &str =
    "id, user_id, title, time_minutes, price, link, description, created_at";

/// Recipe storage. Every call is scoped to one owner; records of other owners
/// behave as if they do not exist.
#[async_trait]
pub trait RecipeRepo: Send + Sync {
    /// Newest first.
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Recipe>>;
    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Recipe>>;
    async fn create(&self, scope: OwnerScope, recipe: NewRecipe) -> anyhow::Result<Recipe>;
    async fn update(
        &self,
        scope: OwnerScope,
        id: i64,
        changes: RecipeChanges,
    ) -> anyhow::Result<Option<Recipe>>;
    /// Returns whether a record was removed.
    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl RecipeRepo for PgStore {
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Recipe>> {
        let rows = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            SELECT {RECIPE_COLUMNS}
              FROM recipes
             WHERE user_id = $1
             ORDER BY id DESC
            "#
        ))
        .bind(scope.owner())
        .fetch_all(self.pool())
        .await
        .context("list recipes")?;
        Ok(rows)
    }

    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(scope.owner())
        .fetch_optional(self.pool())
        .await
        .context("get recipe")?;
        Ok(row)
    }

    async fn create(&self, scope: OwnerScope, recipe: NewRecipe) -> anyhow::Result<Recipe> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            INSERT INTO recipes (user_id, title, time_minutes, price, link, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(scope.owner())
        .bind(recipe.title)
        .bind(recipe.time_minutes)
        .bind(recipe.price)
        .bind(recipe.link)
        .bind(recipe.description)
        .fetch_one(self.pool())
        .await
        .context("insert recipe")?;
        Ok(row)
    }

    async fn update(
        &self,
        scope: OwnerScope,
        id: i64,
        changes: RecipeChanges,
    ) -> anyhow::Result<Option<Recipe>> {
        let row = sqlx::query_as::<_, Recipe>(&format!(
            r#"
            UPDATE recipes
               SET title = COALESCE($3, title),
                   time_minutes = COALESCE($4, time_minutes),
                   price = COALESCE($5, price),
                   link = COALESCE($6, link),
                   description = COALESCE($7, description)
             WHERE id = $1 AND user_id = $2
            RETURNING {RECIPE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(scope.owner())
        .bind(changes.title)
        .bind(changes.time_minutes)
        .bind(changes.price)
        .bind(changes.link)
        .bind(changes.description)
        .fetch_optional(self.pool())
        .await
        .context("update recipe")?;
        Ok(row)
    }

    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM recipes WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(scope.owner())
            .execute(self.pool())
            .await
            .context("delete recipe")?;
        Ok(res.rows_affected() > 0)
    }
}
