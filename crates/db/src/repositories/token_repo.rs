//! Repository for the `verification_tokens` table.
//!
//! Rows older than [`TOKEN_TTL_SECS`] are treated as absent by every read
//! and may be overwritten by a new issue; [`TokenRepo::delete_expired`]
//! removes them physically.

use reelview_core::token::{TokenPurpose, TOKEN_TTL_SECS};
use reelview_core::types::DbId;
use sqlx::PgPool;

use crate::models::token::VerificationTokenRow;

const COLUMNS: &str = "id, owner_id, purpose, token_hash, created_at";

/// Provides lifecycle operations for verification tokens.
pub struct TokenRepo;

impl TokenRepo {
    /// Store a token unless a live one exists for `(owner_id, purpose)`.
    ///
    /// An expired row for the pair is replaced in the same statement.
    /// Returns `None`, leaving the live row untouched, on conflict.
    pub async fn insert_if_absent(
        pool: &PgPool,
        owner_id: DbId,
        purpose: TokenPurpose,
        token_hash: &str,
    ) -> Result<Option<VerificationTokenRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO verification_tokens (owner_id, purpose, token_hash)
             VALUES ($1, $2, $3)
             ON CONFLICT (owner_id, purpose) DO UPDATE
                SET token_hash = EXCLUDED.token_hash, created_at = NOW()
                WHERE verification_tokens.created_at <= NOW() - make_interval(secs => $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationTokenRow>(&query)
            .bind(owner_id)
            .bind(purpose.as_str())
            .bind(token_hash)
            .bind(TOKEN_TTL_SECS as f64)
            .fetch_optional(pool)
            .await
    }

    /// The live token for the pair, if any.
    pub async fn find_live(
        pool: &PgPool,
        owner_id: DbId,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationTokenRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM verification_tokens
             WHERE owner_id = $1 AND purpose = $2
               AND created_at > NOW() - make_interval(secs => $3)"
        );
        sqlx::query_as::<_, VerificationTokenRow>(&query)
            .bind(owner_id)
            .bind(purpose.as_str())
            .bind(TOKEN_TTL_SECS as f64)
            .fetch_optional(pool)
            .await
    }

    /// Delete a token by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_tokens WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every expired token. Returns the count of deleted rows.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM verification_tokens
             WHERE created_at <= NOW() - make_interval(secs => $1)",
        )
        .bind(TOKEN_TTL_SECS as f64)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
