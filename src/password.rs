//! Password hashing
//!
//! bcrypt is CPU-bound, so hashing and verification run on the blocking pool
//! instead of the async executor.

use crate::error::{AppError, AppResult};

/// bcrypt cost factor used for stored passwords
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Lowest cost bcrypt accepts
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest cost bcrypt accepts
pub const MAX_BCRYPT_COST: u32 = 31;

/// Hashes `plaintext` with a fresh random salt
pub async fn hash_password(plaintext: &str, cost: u32) -> AppResult<String> {
    let plaintext = plaintext.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
        .await
        .map_err(|e| AppError::Internal(format!("password hashing task failed: {e}")))?
        .map_err(AppError::from)
}

/// Verifies `plaintext` against a stored bcrypt hash
pub async fn verify_password(plaintext: &str, hash: &str) -> AppResult<bool> {
    let plaintext = plaintext.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("password verification task failed: {e}")))?
        .map_err(AppError::from)
}
