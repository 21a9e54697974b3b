//! Verification token row model.

use reelview_core::error::CoreError;
use reelview_core::token::{TokenPurpose, VerificationToken};
use reelview_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `verification_tokens` table.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationTokenRow {
    pub id: DbId,
    pub owner_id: DbId,
    pub purpose: String,
    pub token_hash: String,
    pub created_at: Timestamp,
}

impl TryFrom<VerificationTokenRow> for VerificationToken {
    type Error = CoreError;

    fn try_from(row: VerificationTokenRow) -> Result<Self, Self::Error> {
        let purpose = TokenPurpose::parse(&row.purpose).ok_or_else(|| {
            CoreError::Internal(format!("Unknown token purpose '{}'", row.purpose))
        })?;
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            purpose,
            token_hash: row.token_hash,
            created_at: row.created_at,
        })
    }
}
