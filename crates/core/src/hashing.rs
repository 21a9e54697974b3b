//! Argon2id hashing for secrets that must never be stored in plaintext.
//!
//! Used for account passwords and for one-time verification codes. Hashes
//! are PHC strings, so the algorithm parameters and salt travel with the
//! hash itself.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::CoreError;

/// Hash a plaintext secret using Argon2id with a random salt.
pub fn hash_secret(secret: &str) -> Result<String, CoreError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CoreError::Internal(format!("Hashing failed: {e}")))
}

/// Verify a plaintext secret against a stored PHC-formatted hash.
///
/// Returns `Ok(false)` on mismatch; errors only when the stored hash is
/// malformed.
pub fn verify_secret(secret: &str, hash: &str) -> Result<bool, CoreError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| CoreError::Internal(format!("Stored hash is malformed: {e}")))?;
    match Argon2::default().verify_password(secret.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CoreError::Internal(format!("Hash verification failed: {e}"))),
    }
}
