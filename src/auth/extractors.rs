use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::error::AppError;

/// The verified identity bound to a single request.
///
/// The authorization gate inserts this into the request's extensions after
/// verifying the bearer token; handlers read it back through `FromRequest`.
/// Extensions are request-scoped, so identities never leak across concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

impl FromRequest for AuthContext {
    type Error = ActixError; // AppError converts into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthContext>().cloned() {
            Some(ctx) => ready(Ok(ctx)),
            None => {
                // Only reachable when a handler is registered outside the
                // gate; treated as an unauthenticated request.
                let err = AppError::Unauthorized("Authorization token missing".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
