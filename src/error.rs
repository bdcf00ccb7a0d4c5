//!
//! # Error Model
//!
//! This module defines the single typed failure `AppError` used throughout the
//! application. Every layer (validation, services, the authorization gate)
//! raises through it instead of handling errors locally; a set of `From`
//! implementations forms the boundary that normalizes raw infrastructure
//! failures (database error codes, token-library errors, malformed
//! identifiers) into the taxonomy.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can
//! return `Result<_, AppError>` and get a uniform JSON error body. Responses
//! with a 5xx status are logged at `error` severity; 4xx responses represent
//! client mistakes and are logged at `warn`.

use actix_web::{error::ResponseError, http::StatusCode, web, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All failure conditions the application distinguishes.
///
/// Each variant carries a client-facing message, except `Internal`, which
/// carries the raw diagnostic text: that text is logged server-side and only
/// exposed in the response body outside production mode.
#[derive(Debug)]
pub enum AppError {
    /// Malformed, missing, or out-of-range input (HTTP 400).
    BadRequest(String),
    /// Missing, invalid, or expired credential (HTTP 401).
    Unauthorized(String),
    /// Authenticated but not entitled to the resource (HTTP 403).
    Forbidden(String),
    /// No such resource (HTTP 404).
    NotFound(String),
    /// Uniqueness violation (HTTP 409).
    Conflict(String),
    /// Anything unexpected: store outage, bug, failed primitive (HTTP 500).
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// True unless `APP_ENV=production`. Diagnostic bodies are development-only.
fn is_development() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v != "production")
        .unwrap_or(true)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::Internal(detail) => {
                log::error!("Server error: {}", detail);
                let mut body = json!({
                    "error": "INTERNAL_SERVER_ERROR",
                    "message": "Internal Server Error",
                });
                if is_development() {
                    body["stack"] = json!(detail);
                }
                HttpResponse::build(status).json(body)
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                log::warn!("Client error ({}): {}", status.as_u16(), msg);
                HttpResponse::build(status).json(json!({
                    "error": "CLIENT_ERROR",
                    "message": msg,
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into the taxonomy.
///
/// A unique-constraint violation (SQLSTATE 23505) becomes `Conflict`, a
/// missing row becomes `NotFound`, and everything else is an `Internal`
/// failure with the original text preserved for logging.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                AppError::Conflict("Duplicate field value entered".into())
            }
            _ => AppError::Internal(error.to_string()),
        }
    }
}

/// Converts validation failures into `BadRequest`, surfacing the first
/// violated constraint's human-readable message.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, field_errors)| field_errors.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid input".into());
        AppError::BadRequest(message)
    }
}

/// Converts token-library failures into `Unauthorized`, distinguishing an
/// expired token from every other verification failure.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        match error.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token expired".into())
            }
            _ => AppError::Unauthorized("Invalid token".into()),
        }
    }
}

/// A malformed identifier in a path segment is a client mistake.
impl From<uuid::Error> for AppError {
    fn from(_: uuid::Error) -> AppError {
        AppError::BadRequest("Invalid Id format".into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

/// JSON body deserialization failures, normalized to the uniform error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

/// Query-string deserialization failures, normalized to the uniform error shape.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (AppError::BadRequest("x".into()), 400),
            (AppError::Unauthorized("x".into()), 401),
            (AppError::Forbidden("x".into()), 403),
            (AppError::NotFound("x".into()), 404),
            (AppError::Conflict("x".into()), 409),
            (AppError::Internal("x".into()), 500),
        ];
        for (error, expected) in cases {
            assert_eq!(error.error_response().status().as_u16(), expected);
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        match error {
            AppError::NotFound(msg) => assert_eq!(msg, "Record not found"),
            other => panic!("Unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_id_maps_to_bad_request() {
        let parse_err = "not-a-uuid".parse::<uuid::Uuid>().unwrap_err();
        let error: AppError = parse_err.into();
        match error {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid Id format"),
            other => panic!("Unexpected mapping: {:?}", other),
        }
    }

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "Value must be at least 3 characters"))]
        value: String,
    }

    #[test]
    fn test_first_violation_message_is_surfaced() {
        let probe = Probe { value: "ab".into() };
        let error: AppError = probe.validate().unwrap_err().into();
        match error {
            AppError::BadRequest(msg) => assert_eq!(msg, "Value must be at least 3 characters"),
            other => panic!("Unexpected mapping: {:?}", other),
        }
    }
}
