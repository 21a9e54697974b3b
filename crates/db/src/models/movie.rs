//! Movie entity model, credit rows, and DTOs.

use chrono::NaiveDate;
use reelview_core::ranking::MovieCard;
use reelview_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub director_id: Option<DbId>,
    pub release_date: NaiveDate,
    pub status: String,
    pub content_type: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub poster_url: Option<String>,
    pub poster_public_id: Option<String>,
    pub poster_responsive: Vec<String>,
    pub trailer_url: String,
    pub trailer_public_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    pub fn card(&self) -> MovieCard {
        MovieCard {
            id: self.id,
            title: self.title.clone(),
            poster: self.poster_url.clone(),
            responsive_posters: self.poster_responsive.clone(),
        }
    }
}

/// The columns behind a [`MovieCard`].
#[derive(Debug, Clone, FromRow)]
pub struct MovieCardRow {
    pub id: DbId,
    pub title: String,
    pub poster_url: Option<String>,
    pub poster_responsive: Vec<String>,
}

impl From<MovieCardRow> for MovieCard {
    fn from(row: MovieCardRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            poster: row.poster_url,
            responsive_posters: row.poster_responsive,
        }
    }
}

/// A public movie card with its review count, used by top-rated queries.
#[derive(Debug, Clone, FromRow)]
pub struct PopularMovieRow {
    pub id: DbId,
    pub title: String,
    pub poster_url: Option<String>,
    pub poster_responsive: Vec<String>,
    pub review_count: i64,
}

/// Admin listing row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieSummary {
    pub id: DbId,
    pub title: String,
    #[serde(rename = "poster")]
    pub poster_url: Option<String>,
    pub genres: Vec<String>,
    pub status: String,
}

/// A writer or director credit joined with the actor's display fields.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CreditedActor {
    pub id: DbId,
    pub name: String,
    #[serde(rename = "avatar")]
    pub avatar_url: Option<String>,
}

/// A cast credit joined with the actor's display fields.
#[derive(Debug, Clone, FromRow)]
pub struct CastCreditRow {
    pub actor_id: DbId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role_as: String,
    pub lead_actor: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub actor: CreditedActor,
    pub role_as: String,
    pub lead_actor: bool,
}

impl From<CastCreditRow> for CastMember {
    fn from(row: CastCreditRow) -> Self {
        Self {
            actor: CreditedActor {
                id: row.actor_id,
                name: row.name,
                avatar_url: row.avatar_url,
            },
            role_as: row.role_as,
            lead_actor: row.lead_actor,
        }
    }
}

/// A movie with its credits resolved, as shown on detail pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub director: Option<CreditedActor>,
    pub writers: Vec<CreditedActor>,
    pub cast: Vec<CastMember>,
    pub release_date: NaiveDate,
    pub status: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
    pub trailer: String,
}

// ---------------------------------------------------------------------------
// DTOs (write payloads)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CastInput {
    pub actor_id: DbId,
    pub role_as: String,
    pub lead_actor: bool,
}

/// An uploaded poster as reported by the media host.
#[derive(Debug, Clone)]
pub struct PosterInput {
    pub url: String,
    pub public_id: String,
    pub responsive: Vec<String>,
}

/// Fields written by both create and update.
///
/// On update the poster columns are only replaced when `poster` is `Some`.
#[derive(Debug, Clone)]
pub struct MovieInput {
    pub title: String,
    pub story_line: String,
    pub director_id: Option<DbId>,
    pub writers: Vec<DbId>,
    pub cast: Vec<CastInput>,
    pub release_date: NaiveDate,
    pub status: String,
    pub content_type: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub language: String,
    pub trailer_url: String,
    pub trailer_public_id: String,
    pub poster: Option<PosterInput>,
}
