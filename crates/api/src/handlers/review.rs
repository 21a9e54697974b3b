//! Handlers for the `/review` resource.

use axum::extract::{Path, State};
use axum::Json;
use reelview_core::error::CoreError;
use reelview_core::movie::STATUS_PUBLIC;
use reelview_core::rating::RatingSummary;
use reelview_core::review::validate_rating;
use reelview_core::types::DbId;
use reelview_db::models::review::{CreateReview, ReviewResponse};
use reelview_db::repositories::{MovieRepo, ReviewRepo, UserRepo};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    #[serde(default)]
    pub content: String,
    pub rating: f64,
}

#[derive(Debug, Serialize)]
pub struct ReviewAdded {
    pub message: &'static str,
    pub reviews: RatingSummary,
}

#[derive(Debug, Serialize)]
pub struct MovieReviews {
    pub title: String,
    pub reviews: Vec<ReviewResponse>,
}

#[derive(Debug, Serialize)]
pub struct MovieReviewsEnvelope {
    pub movie: MovieReviews,
}

/// POST /api/review/add/{movie_id}
///
/// Verified users only, one review per user per public movie.
pub async fn add(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<ReviewAdded>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: auth.user_id,
        }))?;
    if !user.is_verified {
        return Err(AppError::Core(CoreError::Forbidden(
            "Please verify your email first!".into(),
        )));
    }
    validate_rating(input.rating)?;

    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .filter(|m| m.status == STATUS_PUBLIC)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "movie",
            id: movie_id,
        }))?;

    let review = ReviewRepo::create(
        &state.pool,
        &CreateReview {
            owner_id: user.id,
            movie_id: movie.id,
            content: input.content.trim().to_string(),
            rating: input.rating,
        },
    )
    .await
    .map_err(already_reviewed)?;
    tracing::info!(review_id = review.id, movie_id, owner_id = user.id, "Review added");

    let reviews = state.ratings.summary(movie.id).await?;
    Ok(Json(ReviewAdded {
        message: "Your review has been added.",
        reviews,
    }))
}

/// PATCH /api/review/{review_id}
///
/// Only the owner may edit; anyone else sees 404.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
    Json(input): Json<ReviewRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_rating(input.rating)?;

    ReviewRepo::update_owned(
        &state.pool,
        review_id,
        auth.user_id,
        input.content.trim(),
        input.rating,
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "review",
        id: review_id,
    }))?;

    Ok(Json(MessageResponse {
        message: "Your review has been updated.",
    }))
}

/// DELETE /api/review/{review_id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !ReviewRepo::delete_owned(&state.pool, review_id, auth.user_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "review",
            id: review_id,
        }));
    }
    tracing::info!(review_id, owner_id = auth.user_id, "Review removed");

    Ok(Json(MessageResponse {
        message: "Review removed successfully.",
    }))
}

/// GET /api/review/get-reviews-by-movie/{movie_id}
///
/// Public.
pub async fn list_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<MovieReviewsEnvelope>> {
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "movie",
            id: movie_id,
        }))?;
    let reviews = ReviewRepo::list_for_movie(&state.pool, movie_id).await?;

    Ok(Json(MovieReviewsEnvelope {
        movie: MovieReviews {
            title: movie.title,
            reviews: reviews.into_iter().map(ReviewResponse::from).collect(),
        },
    }))
}

/// Report the per-owner uniqueness violation in the user's terms.
fn already_reviewed(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some("uq_reviews_owner_movie") {
            return AppError::Core(CoreError::Conflict(
                "Invalid request, review is already there!".into(),
            ));
        }
    }
    AppError::Database(err)
}
