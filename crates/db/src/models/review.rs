//! Review entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use reelview_core::types::{DbId, Timestamp};

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow)]
pub struct Review {
    pub id: DbId,
    pub owner_id: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub rating: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review joined with its owner's display name.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewWithOwner {
    pub id: DbId,
    pub owner_id: DbId,
    pub owner_name: String,
    pub content: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewOwner {
    pub id: DbId,
    pub name: String,
}

/// Public shape of a review in a movie's review list.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: DbId,
    pub owner: ReviewOwner,
    pub content: String,
    pub rating: f64,
}

impl From<ReviewWithOwner> for ReviewResponse {
    fn from(row: ReviewWithOwner) -> Self {
        Self {
            id: row.id,
            owner: ReviewOwner {
                id: row.owner_id,
                name: row.owner_name,
            },
            content: row.content,
            rating: row.rating,
        }
    }
}

/// DTO for creating a review.
#[derive(Debug, Clone)]
pub struct CreateReview {
    pub owner_id: DbId,
    pub movie_id: DbId,
    pub content: String,
    pub rating: f64,
}
