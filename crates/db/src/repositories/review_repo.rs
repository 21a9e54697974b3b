//! Repository for the `reviews` table.
//!
//! A review is one row referencing its movie; the movie's review list is
//! derived from `reviews.movie_id`, so there is no second write to keep
//! in sync.

use reelview_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewWithOwner};

const COLUMNS: &str = "id, owner_id, movie_id, content, rating, created_at, updated_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review.
    ///
    /// A second review by the same owner for the same movie violates
    /// `uq_reviews_owner_movie`.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (owner_id, movie_id, content, rating)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.owner_id)
            .bind(input.movie_id)
            .bind(&input.content)
            .bind(input.rating)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update content and rating of a review owned by `owner_id`.
    ///
    /// Returns `None` when the review does not exist or belongs to someone
    /// else.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        content: &str,
        rating: f64,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET content = $3, rating = $4
             WHERE id = $1 AND owner_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(content)
            .bind(rating)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review owned by `owner_id`. Returns `true` if a row was removed.
    pub async fn delete_owned(pool: &PgPool, id: DbId, owner_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reviews for a movie with their owners, oldest first.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<ReviewWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithOwner>(
            "SELECT r.id, r.owner_id, u.name AS owner_name, r.content, r.rating
             FROM reviews r
             JOIN users u ON u.id = r.owner_id
             WHERE r.movie_id = $1
             ORDER BY r.created_at, r.id",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Mean rating and count for a movie. The mean is `None` with no reviews.
    pub async fn rating_stats(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<(Option<f64>, i64), sqlx::Error> {
        sqlx::query_as(
            "SELECT AVG(rating)::float8, COUNT(*) FROM reviews WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_one(pool)
        .await
    }
}
