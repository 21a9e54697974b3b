//! Account password rules and hashing.
//!
//! Hashing itself is Argon2id via [`reelview_core::hashing`]; this module
//! adds the length policy enforced on sign-up and reset.

use reelview_core::error::CoreError;
use reelview_core::hashing::{hash_secret, verify_secret};

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Maximum password length in characters.
pub const PASSWORD_MAX_LEN: usize = 20;

/// Hash a plaintext password using Argon2id with a random salt.
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    hash_secret(password)
}

/// Verify a plaintext password against a stored PHC-formatted hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, CoreError> {
    verify_secret(password, hash)
}

/// Enforce the 8 to 20 character length policy.
pub fn validate_password_length(password: &str) -> Result<(), CoreError> {
    let len = password.trim().chars().count();
    if len == 0 {
        return Err(CoreError::Validation("Password is missing!".into()));
    }
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(CoreError::Validation(format!(
            "Password must be {PASSWORD_MIN_LEN} to {PASSWORD_MAX_LEN} characters long!"
        )));
    }
    Ok(())
}
