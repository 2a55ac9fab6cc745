use std::collections::BTreeMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Per-field validation messages, keyed by the offending JSON field.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const REQUIRED: &str = "This field is required.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0:?}")]
    Validation(FieldErrors),

    #[error("unauthorized: {0}")]
    Unauthorized(&'static str),

    #[error("not found")]
    NotFound,

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.to_string(), vec![message.into()]);
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            AppError::Unauthorized(detail) => (
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Token")],
                Json(json!({ "detail": detail })),
            )
                .into_response(),
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            }
            AppError::Internal(e) => {
                error!(error = %e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}

/// Accumulates field errors so a payload reports every problem at once.
#[derive(Debug, Default)]
pub struct Violations(FieldErrors);

impl Violations {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn require<T>(&mut self, field: &str, value: &Option<T>) {
        if value.is_none() {
            self.add(field, REQUIRED);
        }
    }

    /// Non-blank text of at most `max_len` characters.
    pub fn check_text(&mut self, field: &str, value: &str, max_len: usize, allow_blank: bool) {
        if !allow_blank && value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        }
        if value.chars().count() > max_len {
            self.add(
                field,
                format!("Ensure this field has no more than {max_len} characters."),
            );
        }
    }

    pub fn finish(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.0))
        }
    }
}
