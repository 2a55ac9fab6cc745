use anyhow::Context;
use async_trait::async_trait;
use uuid::Uuid;

use crate::db::PgStore;

pub use super::repo_types::{EmailTaken, NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, email, name, password_hash, token_id, created_at";

/// Turns a unique violation into `EmailTaken`; anything else keeps its context.
fn email_conflict(e: sqlx::Error, what: &'static str) -> anyhow::Error {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => EmailTaken.into(),
        _ => anyhow::Error::new(e).context(what),
    }
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Fails with `EmailTaken` when the email is already registered.
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
    /// Fails with `EmailTaken` when changing to an email held by another user.
    async fn update(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<Option<User>>;
    /// Replaces the user's active token id, invalidating any earlier token.
    async fn set_token_id(&self, id: Uuid, token_id: Uuid) -> anyhow::Result<()>;
}

#[async_trait]
impl UserRepo for PgStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool())
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.email)
        .bind(user.name)
        .bind(user.password_hash)
        .fetch_one(self.pool())
        .await
        .map_err(|e| email_conflict(e, "insert user"))?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET email = COALESCE($2, email),
                   name = COALESCE($3, name),
                   password_hash = COALESCE($4, password_hash)
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.email)
        .bind(changes.name)
        .bind(changes.password_hash)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| email_conflict(e, "update user"))?;
        Ok(user)
    }

    async fn set_token_id(&self, id: Uuid, token_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET token_id = $2 WHERE id = $1")
            .bind(id)
            .bind(token_id)
            .execute(self.pool())
            .await
            .context("store token id")?;
        Ok(())
    }
}
