//! In-memory stores for tests, mirroring the Postgres semantics.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo::{EmailTaken, NewUser, User, UserChanges, UserRepo};
use crate::auth::scope::OwnerScope;
use crate::recipes::repo::{NewRecipe, Recipe, RecipeChanges, RecipeRepo};
use crate::tags::repo::{Tag, TagRepo};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    recipes: Vec<Recipe>,
    tags: Vec<Tag>,
    last_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut inner = self.lock();
        if inner.users.iter().any(|u| u.email == user.email) {
            return Err(EmailTaken.into());
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            token_id: None,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let mut inner = self.lock();
        if let Some(email) = &changes.email {
            if inner.users.iter().any(|u| &u.email == email && u.id != id) {
                return Err(EmailTaken.into());
            }
        }
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        Ok(Some(user.clone()))
    }

    async fn set_token_id(&self, id: Uuid, token_id: Uuid) -> anyhow::Result<()> {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == id) {
            user.token_id = Some(token_id);
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeRepo for MemoryStore {
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Recipe>> {
        let mut rows = scope.apply(self.lock().recipes.iter().cloned());
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(rows)
    }

    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Recipe>> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|r| r.id == id && scope.permits(*r))
            .cloned())
    }

    async fn create(&self, scope: OwnerScope, recipe: NewRecipe) -> anyhow::Result<Recipe> {
        let mut inner = self.lock();
        let recipe = Recipe {
            id: inner.next_id(),
            user_id: scope.owner(),
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            description: recipe.description,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.recipes.push(recipe.clone());
        Ok(recipe)
    }

    async fn update(
        &self,
        scope: OwnerScope,
        id: i64,
        changes: RecipeChanges,
    ) -> anyhow::Result<Option<Recipe>> {
        let mut inner = self.lock();
        let Some(recipe) = inner
            .recipes
            .iter_mut()
            .find(|r| r.id == id && scope.permits(&**r))
        else {
            return Ok(None);
        };
        if let Some(title) = changes.title {
            recipe.title = title;
        }
        if let Some(minutes) = changes.time_minutes {
            recipe.time_minutes = minutes;
        }
        if let Some(price) = changes.price {
            recipe.price = price;
        }
        if let Some(link) = changes.link {
            recipe.link = link;
        }
        if let Some(description) = changes.description {
            recipe.description = description;
        }
        Ok(Some(recipe.clone()))
    }

    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock();
        let before = inner.recipes.len();
        inner.recipes.retain(|r| !(r.id == id && scope.permits(r)));
        Ok(inner.recipes.len() < before)
    }
}

#[async_trait]
impl TagRepo for MemoryStore {
    async fn list(&self, scope: OwnerScope) -> anyhow::Result<Vec<Tag>> {
        let mut rows = scope.apply(self.lock().tags.iter().cloned());
        rows.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(rows)
    }

    async fn get(&self, scope: OwnerScope, id: i64) -> anyhow::Result<Option<Tag>> {
        Ok(self
            .lock()
            .tags
            .iter()
            .find(|t| t.id == id && scope.permits(*t))
            .cloned())
    }

    async fn create(&self, scope: OwnerScope, name: String) -> anyhow::Result<Tag> {
        let mut inner = self.lock();
        let tag = Tag {
            id: inner.next_id(),
            user_id: scope.owner(),
            name,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.tags.push(tag.clone());
        Ok(tag)
    }

    async fn rename(&self, scope: OwnerScope, id: i64, name: String) -> anyhow::Result<Option<Tag>> {
        let mut inner = self.lock();
        let Some(tag) = inner
            .tags
            .iter_mut()
            .find(|t| t.id == id && scope.permits(&**t))
        else {
            return Ok(None);
        };
        tag.name = name;
        Ok(Some(tag.clone()))
    }

    async fn delete(&self, scope: OwnerScope, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.lock();
        let before = inner.tags.len();
        inner.tags.retain(|t| !(t.id == id && scope.permits(t)));
        Ok(inner.tags.len() < before)
    }
}
