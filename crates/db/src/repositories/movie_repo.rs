//! Repository for the `movies`, `movie_writers` and `movie_cast` tables.
//!
//! A movie and its credits are written in one transaction; credits are
//! replaced wholesale on update, keeping their submitted order in the
//! `position` column.

use reelview_core::movie::STATUS_PUBLIC;
use reelview_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::{
    CastCreditRow, CastInput, CastMember, CreditedActor, Movie, MovieCardRow, MovieDetail,
    MovieInput, MovieSummary, PopularMovieRow,
};
use crate::repositories::actor_repo::contains_pattern;

/// Column list for `movies` queries.
const COLUMNS: &str = "\
    id, title, story_line, director_id, release_date, status, content_type, \
    genres, tags, language, poster_url, poster_public_id, poster_responsive, \
    trailer_url, trailer_public_id, created_at, updated_at";

/// Column list for [`MovieCardRow`].
const CARD_COLUMNS: &str = "id, title, poster_url, poster_responsive";

/// Maximum number of rows a title search returns.
const SEARCH_LIMIT: i64 = 10;

/// Provides CRUD, listing and ranking queries for movies.
pub struct MovieRepo;

impl MovieRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Insert a movie with its writer and cast credits.
    pub async fn create(pool: &PgPool, input: &MovieInput) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (poster_url, poster_public_id, poster_responsive) = match &input.poster {
            Some(p) => (Some(&p.url), Some(&p.public_id), p.responsive.clone()),
            None => (None, None, Vec::new()),
        };

        let query = format!(
            "INSERT INTO movies \
                (title, story_line, director_id, release_date, status, content_type, \
                 genres, tags, language, poster_url, poster_public_id, poster_responsive, \
                 trailer_url, trailer_public_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.director_id)
            .bind(input.release_date)
            .bind(&input.status)
            .bind(&input.content_type)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.language)
            .bind(poster_url)
            .bind(poster_public_id)
            .bind(&poster_responsive)
            .bind(&input.trailer_url)
            .bind(&input.trailer_public_id)
            .fetch_one(&mut *tx)
            .await?;

        Self::set_credits_inner(&mut tx, movie.id, &input.writers, &input.cast).await?;

        tx.commit().await?;
        Ok(movie)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie and resolve its director, writers and cast.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<MovieDetail>, sqlx::Error> {
        let Some(movie) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let director = match movie.director_id {
            Some(director_id) => {
                sqlx::query_as::<_, CreditedActor>(
                    "SELECT id, name, avatar_url FROM actors WHERE id = $1",
                )
                .bind(director_id)
                .fetch_optional(pool)
                .await?
            }
            None => None,
        };
        let writers = Self::writers(pool, id).await?;
        let cast = Self::cast(pool, id).await?;

        Ok(Some(MovieDetail {
            id: movie.id,
            title: movie.title,
            story_line: movie.story_line,
            director,
            writers,
            cast,
            release_date: movie.release_date,
            status: movie.status,
            content_type: movie.content_type,
            genres: movie.genres,
            tags: movie.tags,
            language: movie.language,
            poster: movie.poster_url,
            responsive_posters: movie.poster_responsive,
            trailer: movie.trailer_url,
        }))
    }

    /// Replace every editable field and the credits of a movie.
    ///
    /// Poster columns change only when `input.poster` is set. Returns
    /// `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &MovieInput,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (poster_url, poster_public_id, poster_responsive) = match &input.poster {
            Some(p) => (Some(&p.url), Some(&p.public_id), Some(p.responsive.clone())),
            None => (None, None, None),
        };

        let query = format!(
            "UPDATE movies SET \
                title = $2, \
                story_line = $3, \
                director_id = $4, \
                release_date = $5, \
                status = $6, \
                content_type = $7, \
                genres = $8, \
                tags = $9, \
                language = $10, \
                trailer_url = $11, \
                trailer_public_id = $12, \
                poster_url = COALESCE($13, poster_url), \
                poster_public_id = COALESCE($14, poster_public_id), \
                poster_responsive = COALESCE($15, poster_responsive) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.director_id)
            .bind(input.release_date)
            .bind(&input.status)
            .bind(&input.content_type)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.language)
            .bind(&input.trailer_url)
            .bind(&input.trailer_public_id)
            .bind(poster_url)
            .bind(poster_public_id)
            .bind(poster_responsive)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(movie) = movie else {
            return Ok(None);
        };

        Self::set_credits_inner(&mut tx, movie.id, &input.writers, &input.cast).await?;

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Delete a movie. Credits and reviews cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Credits
    // -----------------------------------------------------------------------

    /// Writers in credit order.
    pub async fn writers(pool: &PgPool, movie_id: DbId) -> Result<Vec<CreditedActor>, sqlx::Error> {
        sqlx::query_as::<_, CreditedActor>(
            "SELECT a.id, a.name, a.avatar_url \
             FROM movie_writers w \
             JOIN actors a ON a.id = w.actor_id \
             WHERE w.movie_id = $1 \
             ORDER BY w.position",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Cast in credit order.
    pub async fn cast(pool: &PgPool, movie_id: DbId) -> Result<Vec<CastMember>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CastCreditRow>(
            "SELECT c.actor_id, a.name, a.avatar_url, c.role_as, c.lead_actor \
             FROM movie_cast c \
             JOIN actors a ON a.id = c.actor_id \
             WHERE c.movie_id = $1 \
             ORDER BY c.position",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(CastMember::from).collect())
    }

    async fn set_credits_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        movie_id: DbId,
        writers: &[DbId],
        cast: &[CastInput],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM movie_writers WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM movie_cast WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut **tx)
            .await?;

        for (position, &actor_id) in writers.iter().enumerate() {
            sqlx::query(
                "INSERT INTO movie_writers (movie_id, actor_id, position) VALUES ($1, $2, $3)",
            )
            .bind(movie_id)
            .bind(actor_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }

        for (position, member) in cast.iter().enumerate() {
            sqlx::query(
                "INSERT INTO movie_cast (movie_id, actor_id, role_as, lead_actor, position) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(movie_id)
            .bind(member.actor_id)
            .bind(&member.role_as)
            .bind(member.lead_actor)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Listing and search
    // -----------------------------------------------------------------------

    /// A page of movies of any status, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieSummary>(
            "SELECT id, title, poster_url, genres, status FROM movies \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Case-insensitive title search across all statuses.
    pub async fn search_by_title(
        pool: &PgPool,
        title: &str,
    ) -> Result<Vec<MovieSummary>, sqlx::Error> {
        sqlx::query_as::<_, MovieSummary>(
            "SELECT id, title, poster_url, genres, status FROM movies \
             WHERE title ILIKE $1 \
             ORDER BY title \
             LIMIT $2",
        )
        .bind(contains_pattern(title))
        .bind(SEARCH_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Case-insensitive title search over public movies.
    pub async fn search_public(
        pool: &PgPool,
        title: &str,
    ) -> Result<Vec<MovieCardRow>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM movies \
             WHERE status = $1 AND title ILIKE $2 \
             ORDER BY title \
             LIMIT $3"
        );
        sqlx::query_as::<_, MovieCardRow>(&query)
            .bind(STATUS_PUBLIC)
            .bind(contains_pattern(title))
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await
    }

    /// The newest public movies.
    pub async fn latest_public(pool: &PgPool, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies \
             WHERE status = $1 \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(STATUS_PUBLIC)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Ranking
    // -----------------------------------------------------------------------

    /// Movies of any status sharing a tag with `tags`, in insertion order.
    pub async fn related_by_tags(
        pool: &PgPool,
        movie_id: DbId,
        tags: &[String],
        limit: i64,
    ) -> Result<Vec<MovieCardRow>, sqlx::Error> {
        let query = format!(
            "SELECT {CARD_COLUMNS} FROM movies \
             WHERE tags && $1 AND id <> $2 \
             ORDER BY id \
             LIMIT $3"
        );
        sqlx::query_as::<_, MovieCardRow>(&query)
            .bind(tags)
            .bind(movie_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Public movies with at least one review, most reviewed first.
    ///
    /// Ties are broken by newest movie first, then by id.
    pub async fn top_rated(
        pool: &PgPool,
        content_type: Option<&str>,
        limit: i64,
    ) -> Result<Vec<PopularMovieRow>, sqlx::Error> {
        sqlx::query_as::<_, PopularMovieRow>(
            "SELECT m.id, m.title, m.poster_url, m.poster_responsive, \
                    COUNT(r.id) AS review_count \
             FROM movies m \
             JOIN reviews r ON r.movie_id = m.id \
             WHERE m.status = $1 \
               AND ($2::text IS NULL OR m.content_type = $2) \
             GROUP BY m.id \
             ORDER BY review_count DESC, m.created_at DESC, m.id DESC \
             LIMIT $3",
        )
        .bind(STATUS_PUBLIC)
        .bind(content_type)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
