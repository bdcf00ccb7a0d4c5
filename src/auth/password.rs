use crate::error::AppError;
use bcrypt::{hash, verify};

/// Work factor for the password digest.
pub const HASH_COST: u32 = 10;

/// Structurally valid digest compared against when a login email matches no
/// account, so both failure paths cost one verification. The compare result
/// is discarded on that path.
pub const DUMMY_DIGEST: &str = "$2b$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, HASH_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, digest: &str) -> Result<bool, AppError> {
    verify(password, digest)
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
