use std::sync::Arc;

use reelview_cloud::MediaHost;
use reelview_core::rating::RatingAggregator;
use reelview_core::ranking::MovieFinder;
use reelview_core::token::TokenManager;
use reelview_db::stores::{PgCatalogStore, PgTokenStore};
use reelview_notify::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelview_db::DbPool,
    /// Server configuration (JWT settings, frontend URL).
    pub config: Arc<ServerConfig>,
    /// Hosted storage for avatars, posters and trailers.
    pub media: Arc<dyn MediaHost>,
    /// Outbound account email.
    pub mailer: Arc<dyn Mailer>,
    /// Per-movie rating summaries.
    pub ratings: RatingAggregator,
    /// Related-by-tag and top-rated movie lists.
    pub finder: MovieFinder,
    /// Email verification and password reset codes.
    pub tokens: TokenManager,
}

impl AppState {
    /// Wire the core components to Postgres stores over `pool`.
    pub fn new(
        pool: reelview_db::DbPool,
        config: Arc<ServerConfig>,
        media: Arc<dyn MediaHost>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let catalog = Arc::new(PgCatalogStore::new(pool.clone()));
        let ratings = RatingAggregator::new(catalog.clone());
        let finder = MovieFinder::new(catalog, ratings.clone());
        let tokens = TokenManager::new(Arc::new(PgTokenStore::new(pool.clone())));

        Self {
            pool,
            config,
            media,
            mailer,
            ratings,
            finder,
            tokens,
        }
    }
}
