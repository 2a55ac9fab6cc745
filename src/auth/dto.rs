use serde::{Deserialize, Serialize};

use super::repo::User;

/// Body for `/user/create/` and `/user/me/` writes.
#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Request body for token issue.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            email: u.email,
            name: u.name,
        }
    }
}
