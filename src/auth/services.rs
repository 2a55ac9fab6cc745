use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{TokenRequest, UserPayload},
    jwt::JwtKeys,
    password::{hash_password, meets_policy, verify_password, MIN_PASSWORD_LEN},
    repo::{EmailTaken, NewUser, User, UserChanges, UserRepo},
};
use crate::error::{AppError, Violations, REQUIRED};

const EMAIL_MAX_LEN: usize = 255;
const NAME_MAX_LEN: usize = 255;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

const EMAIL_TAKEN: &str = "user with this email already exists.";

/// Lost races on the unique email surface as the same 400 as the pre-check.
fn email_taken(e: anyhow::Error) -> AppError {
    if e.is::<EmailTaken>() {
        AppError::field("email", EMAIL_TAKEN)
    } else {
        AppError::Internal(e)
    }
}

fn check_email(v: &mut Violations, email: &str) {
    if !is_valid_email(email) {
        v.add("email", "Enter a valid email address.");
    }
    v.check_text("email", email, EMAIL_MAX_LEN, false);
}

fn check_password(v: &mut Violations, password: &str) {
    if !meets_policy(password) {
        v.add(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
        );
    }
}

/// Registers a user. The password is stored only as an Argon2 hash.
pub async fn create_user(users: &dyn UserRepo, payload: UserPayload) -> Result<User, AppError> {
    let email = payload.email.as_deref().map(normalize_email);
    let mut v = Violations::default();
    v.require("email", &email);
    v.require("password", &payload.password);
    if let Some(email) = &email {
        check_email(&mut v, email);
    }
    if let Some(password) = &payload.password {
        check_password(&mut v, password);
    }
    if let Some(name) = &payload.name {
        v.check_text("name", name, NAME_MAX_LEN, true);
    }
    v.finish()?;

    let (Some(email), Some(password)) = (email, payload.password) else {
        return Err(AppError::field("non_field_errors", REQUIRED));
    };

    if users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::field("email", EMAIL_TAKEN));
    }

    let user = users
        .create(NewUser {
            email,
            name: payload.name.unwrap_or_default(),
            password_hash: hash_password(&password)?,
        })
        .await
        .map_err(email_taken)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Checks credentials and issues a fresh token, superseding any earlier one.
pub async fn authenticate(
    users: &dyn UserRepo,
    keys: &JwtKeys,
    req: TokenRequest,
) -> Result<String, AppError> {
    let email = normalize_email(&req.email);
    let mut v = Violations::default();
    if email.is_empty() {
        v.add("email", REQUIRED);
    }
    if req.password.is_empty() {
        v.add("password", REQUIRED);
    }
    v.finish()?;

    const BAD_CREDENTIALS: &str = "Unable to authenticate with provided credentials.";

    let Some(user) = users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    };

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS));
    }

    let token_id = Uuid::new_v4();
    users.set_token_id(user.id, token_id).await?;
    let token = keys.sign(user.id, token_id)?;

    info!(user_id = %user.id, "token issued");
    Ok(token)
}

/// Updates the caller's profile. A full update requires email and password.
pub async fn update_profile(
    users: &dyn UserRepo,
    user: &User,
    payload: UserPayload,
    partial: bool,
) -> Result<User, AppError> {
    let email = payload.email.as_deref().map(normalize_email);
    let mut v = Violations::default();
    if !partial {
        v.require("email", &email);
        v.require("password", &payload.password);
    }
    if let Some(email) = &email {
        check_email(&mut v, email);
    }
    if let Some(password) = &payload.password {
        check_password(&mut v, password);
    }
    if let Some(name) = &payload.name {
        v.check_text("name", name, NAME_MAX_LEN, true);
    }
    v.finish()?;

    if let Some(email) = &email {
        if let Some(existing) = users.find_by_email(email).await? {
            if existing.id != user.id {
                return Err(AppError::field("email", EMAIL_TAKEN));
            }
        }
    }

    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    let updated = users
        .update(
            user.id,
            UserChanges {
                email,
                name: payload.name,
                password_hash,
            },
        )
        .await
        .map_err(email_taken)?
        .ok_or(AppError::Unauthorized("Invalid token."))?;

    info!(user_id = %updated.id, "profile updated");
    Ok(updated)
}
