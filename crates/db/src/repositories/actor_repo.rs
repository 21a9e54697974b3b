//! Repository for the `actors` table.

use reelview_core::types::DbId;
use sqlx::PgPool;

use crate::models::actor::{Actor, CreateActor, UpdateActor};

const COLUMNS: &str = "id, name, about, gender, avatar_url, avatar_public_id, created_at, updated_at";

/// Maximum number of rows a name search returns.
const SEARCH_LIMIT: i64 = 10;

/// Provides CRUD and search operations for actors.
pub struct ActorRepo;

impl ActorRepo {
    pub async fn create(pool: &PgPool, input: &CreateActor) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, about, gender, avatar_url, avatar_public_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(&input.avatar_url)
            .bind(&input.avatar_public_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update an actor. Avatar columns are kept when the input has none.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActor,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET
                name = $2,
                about = $3,
                gender = $4,
                avatar_url = COALESCE($5, avatar_url),
                avatar_public_id = COALESCE($6, avatar_public_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(&input.avatar_url)
            .bind(&input.avatar_public_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an actor. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring match on the actor name.
    pub async fn search_by_name(pool: &PgPool, name: &str) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             WHERE name ILIKE $1
             ORDER BY name
             LIMIT $2"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(contains_pattern(name))
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// The most recently created actors.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors ORDER BY created_at DESC, id DESC LIMIT $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// A page of actors, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Return the subset of `ids` that do not exist.
    pub async fn missing_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT requested.id FROM UNNEST($1::bigint[]) AS requested(id)
             WHERE NOT EXISTS (SELECT 1 FROM actors a WHERE a.id = requested.id)",
        )
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

/// Wrap `term` for an `ILIKE` substring match, escaping wildcards.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
