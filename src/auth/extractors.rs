use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::User, scope::OwnerScope};
use crate::{error::AppError, state::AppState};

/// Resolves the `Authorization` header to the calling user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AppError::Unauthorized(
                "Authentication credentials were not provided.",
            ))?;

        // "Token <jwt>" or "Bearer <jwt>"
        let token = header
            .strip_prefix("Token ")
            .or_else(|| header.strip_prefix("Bearer "))
            .map(str::trim)
            .ok_or(AppError::Unauthorized("Invalid authorization scheme."))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Invalid token.")
        })?;

        let user = state
            .users
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized("Invalid token."))?;

        if user.token_id != Some(claims.jti) {
            warn!(user_id = %user.id, "superseded token presented");
            return Err(AppError::Unauthorized("Invalid token."));
        }

        Ok(AuthUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OwnerScope {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        Ok(OwnerScope::new(user.id))
    }
}
