use crate::{
    auth::{LoginRequest, RegisterRequest},
    error::AppError,
    services,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;

/// Register a new user
///
/// Creates a new user account and returns the public user plus a bearer
/// token. Fails with 409 when the (normalized) email is already in use.
#[post("/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    input: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let payload = services::auth::register(&pool, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(payload))
}

/// Login user
///
/// Authenticates a user and returns the public user plus a bearer token.
/// Bad credentials fail with 401 and never reveal whether the account exists.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    input: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let payload = services::auth::login(&pool, input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payload))
}
