//! Related-by-tag and top-rated movie lists.
//!
//! [`MovieFinder`] selects candidate movies through a [`MovieSource`] and
//! attaches a [`RatingSummary`] to each one. The store applies the
//! visibility filter for top-rated lists; the finder enforces ordering,
//! self-exclusion and the result cap.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::Serialize;

use crate::error::CoreError;
use crate::movie::MOVIE_LIST_LIMIT;
use crate::rating::{RatingAggregator, RatingSummary};
use crate::types::DbId;

/// The slim movie projection used by public lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieCard {
    pub id: DbId,
    pub title: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
}

/// A movie together with the number of reviews it has received.
#[derive(Debug, Clone, PartialEq)]
pub struct PopularMovie {
    pub movie: MovieCard,
    pub review_count: i64,
}

/// A movie card plus its current rating summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMovie {
    #[serde(flatten)]
    pub movie: MovieCard,
    pub reviews: RatingSummary,
}

/// Store queries behind the finder.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieSource: Send + Sync {
    /// Movies of any status sharing at least one tag with `tags`,
    /// excluding `movie_id`, at most `limit` of them.
    async fn related_by_tags(
        &self,
        movie_id: DbId,
        tags: Vec<String>,
        limit: i64,
    ) -> Result<Vec<MovieCard>, CoreError>;

    /// Public movies with at least one review, optionally restricted to a
    /// content type, ordered by review count descending.
    async fn top_rated(
        &self,
        content_type: Option<String>,
        limit: i64,
    ) -> Result<Vec<PopularMovie>, CoreError>;
}

#[derive(Clone)]
pub struct MovieFinder {
    movies: Arc<dyn MovieSource>,
    ratings: RatingAggregator,
}

impl MovieFinder {
    pub fn new(movies: Arc<dyn MovieSource>, ratings: RatingAggregator) -> Self {
        Self { movies, ratings }
    }

    /// Up to five other movies that share a tag with the given movie.
    ///
    /// An empty tag list yields an empty result without querying the store.
    pub async fn related(
        &self,
        movie_id: DbId,
        tags: &[String],
    ) -> Result<Vec<RankedMovie>, CoreError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates = self
            .movies
            .related_by_tags(movie_id, tags.to_vec(), MOVIE_LIST_LIMIT)
            .await?;
        candidates.retain(|m| m.id != movie_id);
        candidates.truncate(MOVIE_LIST_LIMIT as usize);

        self.with_ratings(candidates).await
    }

    /// Up to five public movies ordered by review count, most reviewed
    /// first. Movies without reviews never appear.
    pub async fn top_rated(&self, content_type: Option<&str>) -> Result<Vec<RankedMovie>, CoreError> {
        let mut candidates = self
            .movies
            .top_rated(content_type.map(str::to_owned), MOVIE_LIST_LIMIT)
            .await?;
        candidates.retain(|m| m.review_count > 0);
        // Stable, so the store's tie-break order survives.
        candidates.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        candidates.truncate(MOVIE_LIST_LIMIT as usize);

        tracing::debug!(
            content_type = content_type.unwrap_or("*"),
            count = candidates.len(),
            "Top-rated candidates selected",
        );

        self.with_ratings(candidates.into_iter().map(|p| p.movie).collect())
            .await
    }

    /// Attach the current rating summary to every card, preserving order.
    pub async fn with_ratings(&self, movies: Vec<MovieCard>) -> Result<Vec<RankedMovie>, CoreError> {
        let summaries = try_join_all(movies.iter().map(|m| self.ratings.summary(m.id))).await?;
        Ok(movies
            .into_iter()
            .zip(summaries)
            .map(|(movie, reviews)| RankedMovie { movie, reviews })
            .collect())
    }
}
