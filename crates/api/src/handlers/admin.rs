//! Handlers for the `/admin` dashboard.

use axum::extract::State;
use axum::Json;
use reelview_core::ranking::RankedMovie;
use reelview_db::models::stats::AppInfo;
use reelview_db::repositories::StatsRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoEnvelope {
    pub app_info: AppInfo,
}

#[derive(Debug, Serialize)]
pub struct MostRated {
    pub movies: Vec<RankedMovie>,
}

/// GET /api/admin/app-info
pub async fn app_info(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<AppInfoEnvelope>> {
    let app_info = StatsRepo::app_info(&state.pool).await?;
    Ok(Json(AppInfoEnvelope { app_info }))
}

/// GET /api/admin/most-rated
///
/// Top-rated across every content type.
pub async fn most_rated(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<MostRated>> {
    let movies = state.finder.top_rated(None).await?;
    Ok(Json(MostRated { movies }))
}
