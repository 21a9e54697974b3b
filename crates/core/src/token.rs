//! One-time codes for email verification and password reset.
//!
//! Each (owner, purpose) pair moves through `absent -> issued -> absent`.
//! A token leaves the issued state when the caller consumes it after a
//! successful validation, or passively when it is older than
//! [`TOKEN_TTL_SECS`]. Only the Argon2id hash of a code is persisted; the
//! plaintext is handed back once so it can be mailed.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;

use crate::error::CoreError;
use crate::hashing::{hash_secret, verify_secret};
use crate::types::{DbId, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Lifetime of an issued token.
pub const TOKEN_TTL_SECS: i64 = 3600;

/// Digits in an email verification code.
pub const OTP_LENGTH: usize = 6;

/// Random bytes in a password reset token (hex-encoded to 60 characters).
pub const RESET_TOKEN_BYTES: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenPurpose {
    EmailVerification,
    PasswordReset,
}

impl TokenPurpose {
    /// Value stored in the `purpose` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "email_verification" => Some(Self::EmailVerification),
            "password_reset" => Some(Self::PasswordReset),
            _ => None,
        }
    }

    /// Generate a fresh plaintext code of the shape this purpose uses.
    pub fn generate_code(self) -> String {
        match self {
            Self::EmailVerification => generate_otp(),
            Self::PasswordReset => generate_reset_token(),
        }
    }
}

impl fmt::Display for TokenPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted token. `token_hash` is a PHC string, never the plaintext.
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationToken {
    pub id: DbId,
    pub owner_id: DbId,
    pub purpose: TokenPurpose,
    pub token_hash: String,
    pub created_at: Timestamp,
}

impl VerificationToken {
    pub fn expires_at(&self) -> Timestamp {
        self.created_at + chrono::Duration::seconds(TOKEN_TTL_SECS)
    }

    pub fn is_live_at(&self, now: Timestamp) -> bool {
        now < self.expires_at()
    }
}

/// The parts of a user the token lifecycle cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOwner {
    pub id: DbId,
    pub is_verified: bool,
}

/// Persistence for verification tokens.
///
/// Implementations must treat tokens older than [`TOKEN_TTL_SECS`] as
/// absent in every read and in `insert_if_absent`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn find_owner(&self, owner_id: DbId) -> Result<Option<TokenOwner>, CoreError>;

    async fn find_live(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, CoreError>;

    /// Atomically store a new token unless a live one exists for the pair.
    ///
    /// Returns `None`, leaving the existing token untouched, when a live
    /// token is already present. An expired row is replaced.
    async fn insert_if_absent(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
        token_hash: String,
    ) -> Result<Option<VerificationToken>, CoreError>;

    /// Returns `true` if a row was removed.
    async fn delete(&self, token_id: DbId) -> Result<bool, CoreError>;

    /// Physically remove expired rows, returning how many were deleted.
    async fn purge_expired(&self) -> Result<u64, CoreError>;
}

/// A freshly issued token and the one copy of its plaintext.
pub struct IssuedToken {
    pub plaintext: String,
    pub token: VerificationToken,
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("plaintext", &"<redacted>")
            .field("token", &self.token)
            .finish()
    }
}

#[derive(Clone)]
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Issue a new code for `owner_id`.
    ///
    /// Fails with `Conflict` when a live token for the same purpose is
    /// outstanding, or when asking to verify an already verified owner.
    pub async fn issue(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
    ) -> Result<IssuedToken, CoreError> {
        let owner = self
            .store
            .find_owner(owner_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "user",
                id: owner_id,
            })?;

        if purpose == TokenPurpose::EmailVerification && owner.is_verified {
            return Err(CoreError::Conflict("User is already verified!".into()));
        }

        let plaintext = purpose.generate_code();
        let token_hash = hash_secret(&plaintext)?;

        let token = self
            .store
            .insert_if_absent(owner_id, purpose, token_hash)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict("Only after one hour you can request another token!".into())
            })?;

        tracing::info!(owner_id, purpose = %purpose, token_id = token.id, "Verification token issued");
        Ok(IssuedToken { plaintext, token })
    }

    /// Check `code` against the live token for the pair. Never deletes.
    pub async fn validate(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
        code: &str,
    ) -> Result<VerificationToken, CoreError> {
        let token = self
            .store
            .find_live(owner_id, purpose)
            .await?
            .filter(|t| t.is_live_at(chrono::Utc::now()))
            .ok_or(CoreError::NotFound {
                entity: "verification token",
                id: owner_id,
            })?;

        if !verify_secret(code, &token.token_hash)? {
            tracing::debug!(owner_id, purpose = %purpose, "Verification code mismatch");
            return Err(CoreError::Unauthorized("Token is not valid!".into()));
        }
        Ok(token)
    }

    /// Delete a token after the caller has acted on it.
    pub async fn consume(&self, token: &VerificationToken) -> Result<(), CoreError> {
        if !self.store.delete(token.id).await? {
            tracing::debug!(token_id = token.id, "Token already gone when consumed");
        }
        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64, CoreError> {
        self.store.purge_expired().await
    }
}

/// Six random decimal digits; leading zeros allowed.
pub fn generate_otp() -> String {
    let mut rng = rand::rng();
    (0..OTP_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// [`RESET_TOKEN_BYTES`] random bytes as lowercase hex.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; RESET_TOKEN_BYTES];
    rand::rng().fill(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
