//! Whole-catalog counts for the admin dashboard.

use sqlx::PgPool;

use crate::models::stats::AppInfo;

pub struct StatsRepo;

impl StatsRepo {
    pub async fn app_info(pool: &PgPool) -> Result<AppInfo, sqlx::Error> {
        sqlx::query_as::<_, AppInfo>(
            "SELECT
                (SELECT COUNT(*) FROM movies) AS movie_count,
                (SELECT COUNT(*) FROM reviews) AS review_count,
                (SELECT COUNT(*) FROM users) AS user_count",
        )
        .fetch_one(pool)
        .await
    }
}
