use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{TokenRequest, TokenResponse, UserPayload, UserResponse},
    extractors::AuthUser,
    jwt::JwtKeys,
    services,
};
use crate::{error::AppError, extract::JsonBody, state::AppState};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/create/", post(create_user))
        .route("/user/token/", post(create_token))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/user/me/", get(get_me).put(put_me).patch(patch_me))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let user = services::create_user(&*state.users, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn create_token(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let token = services::authenticate(&*state.users, &keys, payload).await?;
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip_all)]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<UserResponse> {
    Json(user.into())
}

#[instrument(skip_all)]
pub async fn put_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Json<UserResponse>, AppError> {
    let user = services::update_profile(&*state.users, &user, payload, false).await?;
    Ok(Json(user.into()))
}

#[instrument(skip_all)]
pub async fn patch_me(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<Json<UserResponse>, AppError> {
    let user = services::update_profile(&*state.users, &user, payload, true).await?;
    Ok(Json(user.into()))
}
