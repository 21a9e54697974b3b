//! Postgres implementations of the core store traits.
//!
//! Each store wraps the pool handed to it at startup and delegates to the
//! repositories, translating `sqlx::Error` into `CoreError::Internal`.

use async_trait::async_trait;
use reelview_core::error::CoreError;
use reelview_core::ranking::{MovieCard, MovieSource, PopularMovie};
use reelview_core::rating::{RatingSource, RatingStats};
use reelview_core::token::{TokenOwner, TokenPurpose, TokenStore, VerificationToken};
use reelview_core::types::DbId;

use crate::repositories::{MovieRepo, ReviewRepo, TokenRepo, UserRepo};
use crate::DbPool;

fn db_err(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Store query failed");
    CoreError::Internal(format!("Database error: {err}"))
}

/// Rating and ranking queries over movies and reviews.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: DbPool,
}

impl PgCatalogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingSource for PgCatalogStore {
    async fn rating_stats(&self, movie_id: DbId) -> Result<Option<RatingStats>, CoreError> {
        let (average, count) = ReviewRepo::rating_stats(&self.pool, movie_id)
            .await
            .map_err(db_err)?;
        Ok(average.map(|average| RatingStats { average, count }))
    }
}

#[async_trait]
impl MovieSource for PgCatalogStore {
    async fn related_by_tags(
        &self,
        movie_id: DbId,
        tags: Vec<String>,
        limit: i64,
    ) -> Result<Vec<MovieCard>, CoreError> {
        let rows = MovieRepo::related_by_tags(&self.pool, movie_id, &tags, limit)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(MovieCard::from).collect())
    }

    async fn top_rated(
        &self,
        content_type: Option<String>,
        limit: i64,
    ) -> Result<Vec<PopularMovie>, CoreError> {
        let rows = MovieRepo::top_rated(&self.pool, content_type.as_deref(), limit)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| PopularMovie {
                review_count: row.review_count,
                movie: MovieCard {
                    id: row.id,
                    title: row.title,
                    poster: row.poster_url,
                    responsive_posters: row.poster_responsive,
                },
            })
            .collect())
    }
}

/// Verification token persistence.
#[derive(Clone)]
pub struct PgTokenStore {
    pool: DbPool,
}

impl PgTokenStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_owner(&self, owner_id: DbId) -> Result<Option<TokenOwner>, CoreError> {
        let user = UserRepo::find_by_id(&self.pool, owner_id)
            .await
            .map_err(db_err)?;
        Ok(user.map(|u| TokenOwner {
            id: u.id,
            is_verified: u.is_verified,
        }))
    }

    async fn find_live(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
    ) -> Result<Option<VerificationToken>, CoreError> {
        TokenRepo::find_live(&self.pool, owner_id, purpose)
            .await
            .map_err(db_err)?
            .map(VerificationToken::try_from)
            .transpose()
    }

    async fn insert_if_absent(
        &self,
        owner_id: DbId,
        purpose: TokenPurpose,
        token_hash: String,
    ) -> Result<Option<VerificationToken>, CoreError> {
        TokenRepo::insert_if_absent(&self.pool, owner_id, purpose, &token_hash)
            .await
            .map_err(db_err)?
            .map(VerificationToken::try_from)
            .transpose()
    }

    async fn delete(&self, token_id: DbId) -> Result<bool, CoreError> {
        TokenRepo::delete(&self.pool, token_id)
            .await
            .map_err(db_err)
    }

    async fn purge_expired(&self) -> Result<u64, CoreError> {
        TokenRepo::delete_expired(&self.pool).await.map_err(db_err)
    }
}
