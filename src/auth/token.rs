use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token lifetime. Tokens are stateless: validity is determined purely by
/// signature and expiry, and there is no revocation list.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Represents the claims encoded within a bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's unique identifier.
    pub sub: Uuid,
    /// Email the token was issued for.
    pub email: String,
    /// Expiration timestamp (seconds since epoch) for the token.
    pub exp: usize,
}

/// Generates a signed token bound to a user id and email.
///
/// It requires the `JWT_SECRET` environment variable to be set for signing.
///
/// # Returns
/// A `Result` containing the token string if successful.
/// Returns `AppError::Internal` if `JWT_SECRET` is not set or encoding fails.
pub fn generate_token(user_id: Uuid, email: &str) -> Result<String, AppError> {
    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::days(TOKEN_TTL_DAYS))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: expiration,
    };

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies a token string and decodes its claims.
///
/// Default validation checks are applied (signature, expiration). Expiry is
/// reported as "Token expired"; every other verification failure, including
/// claims without a decodable subject, as "Invalid token".
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal("JWT_SECRET not set".into()))?;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(AppError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static JWT_ENV_LOCK: Mutex<()> = Mutex::new(());

    // Helper to run test logic with a temporarily set JWT_SECRET
    fn run_with_temp_jwt_secret<F>(secret_value: &str, test_logic: F)
    where
        F: FnOnce(),
    {
        let _guard = JWT_ENV_LOCK.lock().unwrap();

        let original_secret_val = std::env::var("JWT_SECRET").ok();
        std::env::set_var("JWT_SECRET", secret_value);

        // Using a panic hook to ensure cleanup even if test_logic panics
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(test_logic));

        if let Some(original) = original_secret_val {
            std::env::set_var("JWT_SECRET", original);
        } else {
            std::env::remove_var("JWT_SECRET");
        }

        if let Err(panic_payload) = result {
            std::panic::resume_unwind(panic_payload);
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        run_with_temp_jwt_secret("test_secret_for_gen_verify", || {
            let user_id = Uuid::new_v4();
            let token = generate_token(user_id, "ann@example.com").unwrap();
            let claims = verify_token(&token).unwrap();
            assert_eq!(claims.sub, user_id);
            assert_eq!(claims.email, "ann@example.com");
        });
    }

    #[test]
    fn test_expired_token_is_rejected() {
        run_with_temp_jwt_secret("test_secret_for_expiration", || {
            let expiration = chrono::Utc::now()
                .checked_sub_signed(chrono::Duration::hours(2))
                .expect("valid timestamp")
                .timestamp() as usize;

            let claims_expired = Claims {
                sub: Uuid::new_v4(),
                email: "ann@example.com".to_string(),
                exp: expiration,
            };
            let expired_token = encode(
                &Header::default(),
                &claims_expired,
                &EncodingKey::from_secret("test_secret_for_expiration".as_bytes()),
            )
            .unwrap();

            match verify_token(&expired_token) {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Token expired"),
                Ok(_) => panic!("Token should have been invalid due to expiration"),
                Err(e) => panic!("Unexpected error type for expired token: {:?}", e),
            }
        });
    }

    #[test]
    fn test_invalid_token_signature() {
        run_with_temp_jwt_secret("a_completely_different_secret", || {
            let token_signed_with_other_secret = encode(
                &Header::default(),
                &Claims {
                    sub: Uuid::new_v4(),
                    email: "ann@example.com".to_string(),
                    exp: (chrono::Utc::now().timestamp() + 3600) as usize,
                },
                &EncodingKey::from_secret("some_other_secret".as_bytes()),
            )
            .unwrap();

            match verify_token(&token_signed_with_other_secret) {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
                Ok(_) => panic!("Token should have been invalid due to signature mismatch"),
                Err(e) => panic!("Unexpected error type for invalid signature: {:?}", e),
            }
        });
    }

    #[test]
    fn test_token_without_subject_is_rejected() {
        run_with_temp_jwt_secret("test_secret_for_missing_sub", || {
            #[derive(Serialize)]
            struct BareClaims {
                email: String,
                exp: usize,
            }

            let token = encode(
                &Header::default(),
                &BareClaims {
                    email: "ann@example.com".to_string(),
                    exp: (chrono::Utc::now().timestamp() + 3600) as usize,
                },
                &EncodingKey::from_secret("test_secret_for_missing_sub".as_bytes()),
            )
            .unwrap();

            match verify_token(&token) {
                Err(AppError::Unauthorized(msg)) => assert_eq!(msg, "Invalid token"),
                Ok(_) => panic!("Token without a subject should be rejected"),
                Err(e) => panic!("Unexpected error type for subject-less token: {:?}", e),
            }
        });
    }
}
