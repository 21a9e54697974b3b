//! Handlers for the `/movie` resource.
//!
//! Admin routes manage the catalog through multipart forms; public routes
//! serve detail pages and ranked lists with rating summaries attached.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use reelview_cloud::{ImageTransform, MediaKind, UploadedMedia};
use reelview_core::error::CoreError;
use reelview_core::movie::{
    page_window, validate_cast_role, validate_genres, validate_required, validate_status,
    validate_tags, validate_trailer, DEFAULT_CONTENT_TYPE, DEFAULT_LATEST_LIMIT,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use reelview_core::ranking::{MovieCard, RankedMovie};
use reelview_core::rating::RatingSummary;
use reelview_core::types::DbId;
use reelview_db::models::movie::{CastInput, Movie, MovieDetail, MovieInput, MovieSummary, PosterInput};
use reelview_db::repositories::{ActorRepo, MovieRepo};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::FormData;
use crate::query::{ContentTypeParams, LimitParams, PaginationParams, TitleSearchParams};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One entry of the JSON-encoded `cast` form field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CastEntry {
    actor: DbId,
    role_as: String,
    lead_actor: bool,
}

/// The JSON-encoded `trailer` form field, as returned by `/upload-trailer`.
#[derive(Debug, Deserialize)]
struct TrailerRef {
    url: String,
    public_id: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedMovie {
    pub id: DbId,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct MovieEnvelope<T: Serialize> {
    pub movie: T,
}

#[derive(Debug, Serialize)]
pub struct MovieUpdated {
    pub message: &'static str,
    pub movie: MovieSummary,
}

#[derive(Debug, Serialize)]
pub struct MovieList<T: Serialize> {
    pub movies: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct MovieSearchResults<T: Serialize> {
    pub results: Vec<T>,
}

/// A card on the home page strip of newest uploads.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestMovie {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub poster: Option<String>,
    pub responsive_posters: Vec<String>,
    pub trailer: String,
}

impl From<Movie> for LatestMovie {
    fn from(movie: Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            story_line: movie.story_line,
            poster: movie.poster_url,
            responsive_posters: movie.poster_responsive,
            trailer: movie.trailer_url,
        }
    }
}

/// A movie detail page with its rating summary.
#[derive(Debug, Serialize)]
pub struct SingleMovie {
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub reviews: RatingSummary,
}

// ---------------------------------------------------------------------------
// Admin handlers
// ---------------------------------------------------------------------------

/// POST /api/movie/upload-trailer
///
/// Multipart `trailer` video. The returned `{url, public_id}` is sent back
/// as the `trailer` field when the movie is created.
pub async fn upload_trailer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadedMedia>)> {
    let mut form = FormData::read(multipart).await?;
    let file = form.take_video("trailer")?.ok_or_else(|| {
        AppError::Core(CoreError::Validation("Video file is missing!".into()))
    })?;

    let uploaded = state.media.upload_video(file).await?;
    Ok((StatusCode::CREATED, Json(uploaded)))
}

/// POST /api/movie/create
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MovieEnvelope<CreatedMovie>>)> {
    let mut form = FormData::read(multipart).await?;
    let mut input = movie_input(&form)?;
    ensure_credits_exist(&state, &input).await?;

    if let Some(file) = form.take_image("poster")? {
        input.poster = Some(upload_poster(&state, file).await?);
    }

    let movie = MovieRepo::create(&state.pool, &input).await?;
    tracing::info!(movie_id = movie.id, admin_id = admin.user_id, "Movie created");

    Ok((
        StatusCode::CREATED,
        Json(MovieEnvelope {
            movie: CreatedMovie {
                id: movie.id,
                title: movie.title,
            },
        }),
    ))
}

/// PATCH /api/movie/update/{id}
///
/// A new poster replaces the old one; the old poster is destroyed first.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<MovieUpdated>> {
    let mut form = FormData::read(multipart).await?;
    let existing = find_movie(&state, id).await?;
    let mut input = movie_input(&form)?;
    ensure_credits_exist(&state, &input).await?;

    if let Some(file) = form.take_image("poster")? {
        if let Some(public_id) = existing.poster_public_id.as_deref() {
            state
                .media
                .destroy(public_id, MediaKind::Image)
                .await
                .map_err(|e| AppError::upstream("Could not update poster at the moment!", e))?;
        }
        input.poster = Some(upload_poster(&state, file).await?);
    }

    let movie = MovieRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "movie", id }))?;
    tracing::info!(movie_id = id, "Movie updated");

    Ok(Json(MovieUpdated {
        message: "Movie is updated!",
        movie: MovieSummary {
            id: movie.id,
            title: movie.title,
            poster_url: movie.poster_url,
            genres: movie.genres,
            status: movie.status,
        },
    }))
}

/// DELETE /api/movie/{id}
///
/// Poster, then trailer, are destroyed before the row is deleted. Reviews
/// and credits cascade.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let movie = find_movie(&state, id).await?;

    if let Some(public_id) = movie.poster_public_id.as_deref() {
        state
            .media
            .destroy(public_id, MediaKind::Image)
            .await
            .map_err(|e| AppError::upstream("Could not remove poster from cloud!", e))?;
    }
    state
        .media
        .destroy(&movie.trailer_public_id, MediaKind::Video)
        .await
        .map_err(|e| AppError::upstream("Could not remove trailer from cloud!", e))?;

    MovieRepo::delete(&state.pool, id).await?;
    tracing::info!(movie_id = id, "Movie deleted");
    Ok(Json(MessageResponse {
        message: "Movie removed successfully!",
    }))
}

/// GET /api/movie/movies?pageNo=&limit=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<MovieList<MovieSummary>>> {
    let (limit, offset) = page_window(params.page_no, params.limit, DEFAULT_PAGE_SIZE);
    let movies = MovieRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(MovieList { movies }))
}

/// GET /api/movie/for-update/{id}
pub async fn for_update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieEnvelope<MovieDetail>>> {
    let detail = find_detail(&state, id).await?;
    Ok(Json(MovieEnvelope { movie: detail }))
}

/// GET /api/movie/search?title=
pub async fn search(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> AppResult<Json<MovieSearchResults<MovieSummary>>> {
    let title = search_term(&params)?;
    let results = MovieRepo::search_by_title(&state.pool, title).await?;
    Ok(Json(MovieSearchResults { results }))
}

// ---------------------------------------------------------------------------
// Public handlers
// ---------------------------------------------------------------------------

/// GET /api/movie/latest-uploads?limit=
pub async fn latest_uploads(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<MovieList<LatestMovie>>> {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_LATEST_LIMIT)
        .clamp(1, MAX_PAGE_SIZE);
    let movies = MovieRepo::latest_public(&state.pool, limit).await?;
    Ok(Json(MovieList {
        movies: movies.into_iter().map(LatestMovie::from).collect(),
    }))
}

/// GET /api/movie/single/{id}
pub async fn get_single(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieEnvelope<SingleMovie>>> {
    let (detail, reviews) = futures::try_join!(find_detail(&state, id), async {
        state.ratings.summary(id).await.map_err(AppError::from)
    })?;
    Ok(Json(MovieEnvelope {
        movie: SingleMovie { detail, reviews },
    }))
}

/// GET /api/movie/related/{id}
pub async fn related(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MovieList<RankedMovie>>> {
    let movie = find_movie(&state, id).await?;
    let movies = state.finder.related(movie.id, &movie.tags).await?;
    Ok(Json(MovieList { movies }))
}

/// GET /api/movie/top-rated?type=
pub async fn top_rated(
    State(state): State<AppState>,
    Query(params): Query<ContentTypeParams>,
) -> AppResult<Json<MovieList<RankedMovie>>> {
    let content_type = params
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    let movies = state.finder.top_rated(Some(content_type)).await?;
    Ok(Json(MovieList { movies }))
}

/// GET /api/movie/search-public?title=
pub async fn search_public(
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> AppResult<Json<MovieSearchResults<RankedMovie>>> {
    let title = search_term(&params)?;
    let cards = MovieRepo::search_public(&state.pool, title)
        .await?
        .into_iter()
        .map(MovieCard::from)
        .collect();
    let results = state.finder.with_ratings(cards).await?;
    Ok(Json(MovieSearchResults { results }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_movie(state: &AppState, id: DbId) -> AppResult<Movie> {
    MovieRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "movie", id }))
}

async fn find_detail(state: &AppState, id: DbId) -> AppResult<MovieDetail> {
    MovieRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "movie", id }))
}

fn search_term(params: &TitleSearchParams) -> AppResult<&str> {
    let title = params.title.trim();
    if title.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid request!".into(),
        )));
    }
    Ok(title)
}

async fn upload_poster(
    state: &AppState,
    file: reelview_cloud::MediaFile,
) -> AppResult<PosterInput> {
    let uploaded = state
        .media
        .upload_image(file, ImageTransform::Poster)
        .await?;
    Ok(PosterInput {
        url: uploaded.url,
        public_id: uploaded.public_id,
        responsive: uploaded.responsive,
    })
}

fn validation(message: &str) -> AppError {
    AppError::Core(CoreError::Validation(message.to_string()))
}

/// Accepts `YYYY-MM-DD` or an ISO timestamp starting with one.
fn parse_release_date(raw: &str) -> Option<NaiveDate> {
    let date = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Parse and validate the movie form fields. The poster is left unset.
fn movie_input(form: &FormData) -> AppResult<MovieInput> {
    let title = form.text("title").trim().to_string();
    let story_line = form.text("storyLine").trim().to_string();
    let language = form.text("language").trim().to_string();
    let content_type = form.text("type").trim().to_string();
    let status = form.text("status").trim().to_string();

    validate_required(&title, "Movie title is missing!")?;
    validate_required(&story_line, "StoryLine is important!")?;
    validate_required(&language, "Language is missing!")?;
    let release_date = parse_release_date(form.text("releaseDate"))
        .ok_or_else(|| validation("Release date is missing!"))?;
    validate_status(&status)?;
    validate_required(&content_type, "Movie type is missing!")?;

    let genres: Vec<String> = form
        .json("genres", "Genres must be an array of strings!")?
        .ok_or_else(|| validation("Genres must be an array of strings!"))?;
    validate_genres(&genres)?;

    let tags: Vec<String> = form
        .json("tags", "Tags must be an array of strings!")?
        .unwrap_or_default();
    validate_tags(&tags)?;

    let cast: Vec<CastEntry> = form
        .json("cast", "Cast must be an array of objects!")?
        .ok_or_else(|| validation("Cast must be an array of objects!"))?;
    for entry in &cast {
        validate_cast_role(&entry.role_as)?;
    }

    let trailer: TrailerRef = form
        .json("trailer", "Trailer must be an object with url and public_id")?
        .ok_or_else(|| validation("Trailer must be an object with url and public_id"))?;
    validate_trailer(&trailer.url, &trailer.public_id)?;

    let director_id = match form.text("director").trim() {
        "" => None,
        raw => Some(
            raw.parse::<DbId>()
                .map_err(|_| validation("Invalid director id!"))?,
        ),
    };
    let writers: Vec<DbId> = form
        .json("writers", "Invalid writer id!")?
        .unwrap_or_default();

    Ok(MovieInput {
        title,
        story_line,
        director_id,
        writers,
        cast: cast
            .into_iter()
            .map(|c| CastInput {
                actor_id: c.actor,
                role_as: c.role_as.trim().to_string(),
                lead_actor: c.lead_actor,
            })
            .collect(),
        release_date,
        status,
        content_type,
        genres,
        tags: tags.into_iter().map(|t| t.trim().to_string()).collect(),
        language,
        trailer_url: trailer.url,
        trailer_public_id: trailer.public_id,
        poster: None,
    })
}

/// Every referenced actor must exist before anything is uploaded.
async fn ensure_credits_exist(state: &AppState, input: &MovieInput) -> AppResult<()> {
    if let Some(director_id) = input.director_id {
        if !ActorRepo::missing_ids(&state.pool, &[director_id])
            .await?
            .is_empty()
        {
            return Err(validation("Invalid director id!"));
        }
    }
    if !ActorRepo::missing_ids(&state.pool, &input.writers)
        .await?
        .is_empty()
    {
        return Err(validation("Invalid writer id!"));
    }
    let cast_ids: Vec<DbId> = input.cast.iter().map(|c| c.actor_id).collect();
    if !ActorRepo::missing_ids(&state.pool, &cast_ids)
        .await?
        .is_empty()
    {
        return Err(validation("Invalid cast id inside cast!"));
    }
    Ok(())
}
