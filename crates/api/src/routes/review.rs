//! Route definitions for the `/review` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::review;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/add/{movie_id}", post(review::add))
        .route(
            "/{review_id}",
            patch(review::update).delete(review::delete),
        )
        .route(
            "/get-reviews-by-movie/{movie_id}",
            get(review::list_for_movie),
        )
}
