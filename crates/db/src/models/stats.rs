//! Aggregate counts for the admin dashboard.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfo {
    pub movie_count: i64,
    pub review_count: i64,
    pub user_count: i64,
}
