use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::{
    dto::{RecipeDetailResponse, RecipePayload, RecipeResponse},
    services,
};
use crate::{auth::scope::OwnerScope, error::AppError, extract::JsonBody, state::AppState};

pub fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/recipe/recipes/:id/",
            get(get_recipe)
                .put(put_recipe)
                .patch(patch_recipe)
                .delete(delete_recipe),
        )
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    scope: OwnerScope,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let recipes = state.recipes.list(scope).await?;
    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let recipe = state
        .recipes
        .get(scope, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    scope: OwnerScope,
    JsonBody(payload): JsonBody<RecipePayload>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    let new = services::new_recipe(payload)?;
    let recipe = state.recipes.create(scope, new).await?;
    info!(user_id = %scope.owner(), recipe_id = recipe.id, "recipe created");
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

async fn update_recipe(
    state: &AppState,
    scope: OwnerScope,
    id: i64,
    payload: RecipePayload,
    partial: bool,
) -> Result<Json<RecipeResponse>, AppError> {
    // Ownership first: an invisible target is 404 whatever the body holds.
    if state.recipes.get(scope, id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    let changes = services::validate(payload, partial)?;
    let recipe = state
        .recipes
        .update(scope, id, changes)
        .await?
        .ok_or(AppError::NotFound)?;
    info!(user_id = %scope.owner(), recipe_id = id, partial, "recipe updated");
    Ok(Json(recipe.into()))
}

#[instrument(skip(state, payload))]
pub async fn put_recipe(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<RecipePayload>,
) -> Result<Json<RecipeResponse>, AppError> {
    update_recipe(&state, scope, id, payload, false).await
}

#[instrument(skip(state, payload))]
pub async fn patch_recipe(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<RecipePayload>,
) -> Result<Json<RecipeResponse>, AppError> {
    update_recipe(&state, scope, id, payload, true).await
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.recipes.delete(scope, id).await? {
        return Err(AppError::NotFound);
    }
    info!(user_id = %scope.owner(), recipe_id = id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}
