//!
//! # Authentication Service
//!
//! Registration and login orchestration: normalize and validate the input,
//! consult the user store, run the password primitive, and sign a token.
//! Handlers stay thin; everything that can fail raises `AppError`.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password, DUMMY_DIGEST};
use crate::auth::token::generate_token;
use crate::auth::{AuthPayload, LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{PublicUser, User};

/// Registers a new user and signs their first token.
///
/// The email is normalized before the uniqueness check, so two registrations
/// differing only in case collide. A check lost to a concurrent registration
/// still surfaces as a conflict through the unique index on the store.
pub async fn register(pool: &PgPool, input: RegisterRequest) -> Result<AuthPayload, AppError> {
    let input = input.normalized();
    input.validate()?;

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
        .bind(&input.email)
        .fetch_optional(pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let password_hash = hash_password(&input.password)?;

    let user: PublicUser = sqlx::query_as(
        "INSERT INTO users (id, name, email, password_hash, created_at)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, name, email, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.email)
    .bind(&password_hash)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    // If signing fails here the user row is kept; a later login signs a
    // fresh token.
    let token = generate_token(user.id, &user.email)?;

    Ok(AuthPayload { user, token })
}

/// Verifies credentials and signs a token.
///
/// When the email matches no account, the submitted password is still
/// verified against a dummy digest so that both failure paths cost one
/// comparison and response timing does not reveal whether the account
/// exists. Both failures produce the identical message.
pub async fn login(pool: &PgPool, input: LoginRequest) -> Result<AuthPayload, AppError> {
    let input = input.normalized();
    input.validate()?;

    // The only read that includes the digest column.
    let user: Option<User> = sqlx::query_as(
        "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(&input.email)
    .fetch_optional(pool)
    .await?;

    let digest = user
        .as_ref()
        .map(|u| u.password_hash.as_str())
        .unwrap_or(DUMMY_DIGEST);
    let password_matches = verify_password(&input.password, digest)?;

    let user = match user {
        Some(user) if password_matches => user,
        _ => return Err(AppError::Unauthorized("Invalid email or password".into())),
    };

    let token = generate_token(user.id, &user.email)?;

    Ok(AuthPayload {
        user: PublicUser::from(&user),
        token,
    })
}
