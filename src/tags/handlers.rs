use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{TagPayload, TagResponse};
use crate::{
    auth::scope::OwnerScope,
    error::{AppError, Violations},
    extract::JsonBody,
    state::AppState,
};

const NAME_MAX_LEN: usize = 255;

pub fn tag_routes() -> Router<AppState> {
    Router::new()
        .route("/recipe/tags/", get(list_tags).post(create_tag))
        .route(
            "/recipe/tags/:id/",
            patch(patch_tag).put(put_tag).delete(delete_tag),
        )
}

/// Tags have a single writable field, so full and partial updates only
/// differ in whether `name` may be omitted.
fn validate_name(payload: TagPayload, partial: bool) -> Result<Option<String>, AppError> {
    let mut v = Violations::default();
    if !partial {
        v.require("name", &payload.name);
    }
    if let Some(name) = &payload.name {
        v.check_text("name", name, NAME_MAX_LEN, false);
    }
    v.finish()?;
    Ok(payload.name)
}

#[instrument(skip(state))]
pub async fn list_tags(
    State(state): State<AppState>,
    scope: OwnerScope,
) -> Result<Json<Vec<TagResponse>>, AppError> {
    let tags = state.tags.list(scope).await?;
    Ok(Json(tags.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_tag(
    State(state): State<AppState>,
    scope: OwnerScope,
    JsonBody(payload): JsonBody<TagPayload>,
) -> Result<(StatusCode, Json<TagResponse>), AppError> {
    let Some(name) = validate_name(payload, false)? else {
        return Err(AppError::field("name", crate::error::REQUIRED));
    };
    let tag = state.tags.create(scope, name).await?;
    info!(user_id = %scope.owner(), tag_id = tag.id, "tag created");
    Ok((StatusCode::CREATED, Json(tag.into())))
}

async fn update_tag(
    state: &AppState,
    scope: OwnerScope,
    id: i64,
    payload: TagPayload,
    partial: bool,
) -> Result<Json<TagResponse>, AppError> {
    let current = state.tags.get(scope, id).await?.ok_or(AppError::NotFound)?;
    let tag = match validate_name(payload, partial)? {
        Some(name) => state
            .tags
            .rename(scope, id, name)
            .await?
            .ok_or(AppError::NotFound)?,
        None => current,
    };
    info!(user_id = %scope.owner(), tag_id = id, "tag updated");
    Ok(Json(tag.into()))
}

#[instrument(skip(state, payload))]
pub async fn patch_tag(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<TagPayload>,
) -> Result<Json<TagResponse>, AppError> {
    update_tag(&state, scope, id, payload, true).await
}

#[instrument(skip(state, payload))]
pub async fn put_tag(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<TagPayload>,
) -> Result<Json<TagResponse>, AppError> {
    update_tag(&state, scope, id, payload, false).await
}

#[instrument(skip(state))]
pub async fn delete_tag(
    State(state): State<AppState>,
    scope: OwnerScope,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !state.tags.delete(scope, id).await? {
        return Err(AppError::NotFound);
    }
    info!(user_id = %scope.owner(), tag_id = id, "tag deleted");
    Ok(StatusCode::NO_CONTENT)
}
