//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings, so the salt and parameters travel with
//! the hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::sync::OnceLock;

use crate::errors::AppError;

static DUMMY_HASH: OnceLock<String> = OnceLock::new();

/// Hashes a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Returns `Ok(false)` on a mismatch; `Err` only for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// A valid hash nobody's password is checked against for real. Verifying
/// against it costs the same as a real verification.
fn dummy_hash() -> &'static str {
    DUMMY_HASH.get_or_init(|| hash_password("no-such-user-placeholder").unwrap_or_default())
}

/// Checks `password` against the stored hash, or against a placeholder hash
/// when there is none, so unknown accounts take as long to reject as wrong
/// passwords.
pub fn verify_password_or_dummy(
    password: &str,
    hash: Option<&str>,
) -> Result<bool, argon2::password_hash::Error> {
    match hash {
        Some(hash) => verify_password(password, hash),
        None => {
            let _ = verify_password(password, dummy_hash());
            Ok(false)
        }
    }
}

// Argon2 costs tens of milliseconds and ~19 MiB per call; these wrappers keep
// it on the blocking pool instead of an async worker.

/// [`hash_password`] on the blocking pool.
pub async fn hash_in_background(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in password hashing: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// [`verify_password_or_dummy`] on the blocking pool.
pub async fn verify_in_background(password: String, hash: Option<String>) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password_or_dummy(&password, hash.as_deref()))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in password verification: {e}"))
        })?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored password hash is unreadable: {e}")))
}
