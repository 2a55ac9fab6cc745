use anyhow::Context;
use async_trait::async_trait;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::scope::OwnerScope,
    db::PgStore,
};

#[derive(Debug, Clone, FromRow)]
pub struct Tag {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: OffsetDateTime,
}

#[cfg(test)]
impl crate::auth::scope::Owned for Tag {
    fn owner_id(&self) -> Uuid {
        self.user_id
    }
}

#[async_trait]
pub trait TagRepo: Send + Sync {
    /// Ordered by name, descending.
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Tag>>;
    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Tag>>;
    async fn create(&self, scope: OwnerScope, name: String) -> anyhow::Result<Tag>;
    async fn rename(&self, scope: OwnerScope, id: i64, name: String) -> anyhow::Result<Option<Tag>>;
    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool>;
}

#[async_trait]
impl TagRepo for PgStore {
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Tag>> {
        let rows = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, user_id, name, created_at
              FROM tags
             WHERE user_id = $1
             ORDER BY name DESC
            "#,
        )
        .bind(scope.owner())
        .fetch_all(self.pool())
        .await
        .context("list tags")?;
        Ok(rows)
    }

    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Tag>> {
        let row = sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, created_at FROM tags WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(scope.owner())
        .fetch_optional(self.pool())
        .await
        .context("get tag")?;
        Ok(row)
    }

    async fn create(&self, scope: OwnerScope, name: String) -> anyhow::Result<Tag> {
        let row = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name)
            VALUES ($1, $2)
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(scope.owner())
        .bind(name)
        .fetch_one(self.pool())
        .await
        .context("insert tag")?;
        Ok(row)
    }

    async fn rename(&self, scope: OwnerScope, id: i64, name: String) -> anyhow::Result<Option<Tag>> {
        let row = sqlx::query_as::<_, Tag>(
            r#"
            UPDATE tags
               SET name = $3
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, created_at
            "#,
        )
        .bind(id)
        .bind(scope.owner())
        .bind(name)
        .fetch_optional(self.pool())
        .await
        .context("rename tag")?;
        Ok(row)
    }

    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM tags WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(scope.owner())
            .execute(self.pool())
            .await
            .context("delete tag")?;
        Ok(res.rows_affected() > 0)
    }
}
