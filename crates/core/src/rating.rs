//! Per-movie rating aggregation.
//!
//! [`RatingAggregator`] asks a [`RatingSource`] for the raw mean and count
//! of a movie's reviews and shapes them into the [`RatingSummary`] that API
//! responses embed under `reviews`. Nothing is cached: every call reads the
//! store's current state.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::DbId;

/// Raw aggregate over every review whose parent movie matches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingStats {
    pub average: f64,
    pub count: i64,
}

/// Store access needed by the aggregator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RatingSource: Send + Sync {
    /// Mean rating and review count for `movie_id`, or `None` when the
    /// movie has no reviews.
    async fn rating_stats(&self, movie_id: DbId) -> Result<Option<RatingStats>, CoreError>;
}

/// Review statistics as shown to clients.
///
/// Both fields are omitted from the JSON when the movie has no reviews, so
/// the client shows nothing rather than a zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    /// Mean rating rendered with exactly one decimal, e.g. `"8.0"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_avg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<i64>,
}

impl RatingSummary {
    pub fn from_stats(stats: Option<RatingStats>) -> Self {
        match stats {
            Some(s) if s.count > 0 => Self {
                rating_avg: Some(format!("{:.1}", round_to_tenth(s.average))),
                review_count: Some(s.count),
            },
            _ => Self::default(),
        }
    }
}

/// Round half away from zero to one decimal place.
fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Computes [`RatingSummary`] values on demand.
#[derive(Clone)]
pub struct RatingAggregator {
    source: Arc<dyn RatingSource>,
}

impl RatingAggregator {
    pub fn new(source: Arc<dyn RatingSource>) -> Self {
        Self { source }
    }

    /// Summarise every review currently attached to `movie_id`.
    pub async fn summary(&self, movie_id: DbId) -> Result<RatingSummary, CoreError> {
        let stats = self.source.rating_stats(movie_id).await?;
        Ok(RatingSummary::from_stats(stats))
    }
}
