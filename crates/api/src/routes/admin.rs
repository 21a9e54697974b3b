//! Route definitions for the `/admin` dashboard.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/app-info", get(admin::app_info))
        .route("/most-rated", get(admin::most_rated))
}
