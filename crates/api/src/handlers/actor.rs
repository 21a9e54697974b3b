//! Handlers for the `/actor` resource.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use reelview_cloud::{ImageTransform, MediaKind, UploadedMedia};
use reelview_core::actor::{validate_profile, DEFAULT_PAGE_SIZE, LATEST_ACTORS_LIMIT};
use reelview_core::error::CoreError;
use reelview_core::movie::page_window;
use reelview_core::types::DbId;
use reelview_db::models::actor::{Actor, ActorResponse, CreateActor, UpdateActor};
use reelview_db::repositories::ActorRepo;
use serde::Serialize;

use super::MessageResponse;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::FormData;
use crate::query::{NameSearchParams, PaginationParams};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ActorEnvelope {
    pub actor: ActorResponse,
}

#[derive(Debug, Serialize)]
pub struct ActorSearchResults {
    pub results: Vec<ActorResponse>,
}

#[derive(Debug, Serialize)]
pub struct ActorPage {
    pub profiles: Vec<ActorResponse>,
}

/// Text fields shared by create and update.
struct ActorFields {
    name: String,
    about: String,
    gender: String,
}

impl ActorFields {
    fn from_form(form: &FormData) -> AppResult<Self> {
        let fields = Self {
            name: form.text("name").trim().to_string(),
            about: form.text("about").trim().to_string(),
            gender: form.text("gender").trim().to_string(),
        };
        validate_profile(&fields.name, &fields.about, &fields.gender)?;
        Ok(fields)
    }
}

/// POST /api/actor/create
///
/// Multipart: `name`, `about`, `gender`, optional `avatar` image.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ActorEnvelope>)> {
    let mut form = FormData::read(multipart).await?;
    let fields = ActorFields::from_form(&form)?;

    let avatar = upload_avatar(&state, &mut form).await?;
    let actor = ActorRepo::create(
        &state.pool,
        &CreateActor {
            name: fields.name,
            about: fields.about,
            gender: fields.gender,
            avatar_url: avatar.as_ref().map(|a| a.url.clone()),
            avatar_public_id: avatar.map(|a| a.public_id),
        },
    )
    .await?;

    tracing::info!(actor_id = actor.id, admin_id = admin.user_id, "Actor created");
    Ok((
        StatusCode::CREATED,
        Json(ActorEnvelope {
            actor: actor.into(),
        }),
    ))
}

/// POST /api/actor/update/{id}
///
/// A new avatar replaces the old one; the old image is destroyed first and
/// the update is aborted if the media host does not confirm it.
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ActorEnvelope>)> {
    let mut form = FormData::read(multipart).await?;
    let fields = ActorFields::from_form(&form)?;
    let existing = find_actor(&state, id).await?;

    let avatar = match form.take_image("avatar")? {
        Some(file) => {
            if let Some(public_id) = existing.avatar_public_id.as_deref() {
                state
                    .media
                    .destroy(public_id, MediaKind::Image)
                    .await
                    .map_err(|e| AppError::upstream("Could not remove image from cloud!", e))?;
            }
            Some(state.media.upload_image(file, ImageTransform::Avatar).await?)
        }
        None => None,
    };

    let actor = ActorRepo::update(
        &state.pool,
        id,
        &UpdateActor {
            name: fields.name,
            about: fields.about,
            gender: fields.gender,
            avatar_url: avatar.as_ref().map(|a| a.url.clone()),
            avatar_public_id: avatar.map(|a| a.public_id),
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "actor", id }))?;

    tracing::info!(actor_id = id, "Actor updated");
    Ok((
        StatusCode::CREATED,
        Json(ActorEnvelope {
            actor: actor.into(),
        }),
    ))
}

/// DELETE /api/actor/{id}
///
/// The avatar is destroyed before the row. Credits cascade; a movie
/// directed by this actor keeps no director.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let actor = find_actor(&state, id).await?;

    if let Some(public_id) = actor.avatar_public_id.as_deref() {
        state
            .media
            .destroy(public_id, MediaKind::Image)
            .await
            .map_err(|e| AppError::upstream("Could not remove image from cloud!", e))?;
    }

    ActorRepo::delete(&state.pool, id).await?;
    tracing::info!(actor_id = id, "Actor deleted");
    Ok(Json(MessageResponse {
        message: "Record removed successfully!",
    }))
}

/// GET /api/actor/search?name=
pub async fn search(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<NameSearchParams>,
) -> AppResult<Json<ActorSearchResults>> {
    let name = params.name.trim();
    if name.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid request!".into(),
        )));
    }

    let actors = ActorRepo::search_by_name(&state.pool, name).await?;
    Ok(Json(ActorSearchResults {
        results: actors.into_iter().map(ActorResponse::from).collect(),
    }))
}

/// GET /api/actor/latest-uploads
pub async fn latest_uploads(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ActorResponse>>> {
    let actors = ActorRepo::latest(&state.pool, LATEST_ACTORS_LIMIT).await?;
    Ok(Json(actors.into_iter().map(ActorResponse::from).collect()))
}

/// GET /api/actor/actors?pageNo=&limit=
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ActorPage>> {
    let (limit, offset) = page_window(params.page_no, params.limit, DEFAULT_PAGE_SIZE);
    let actors = ActorRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(ActorPage {
        profiles: actors.into_iter().map(ActorResponse::from).collect(),
    }))
}

/// GET /api/actor/single/{id}
///
/// Public.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ActorEnvelope>> {
    let actor = find_actor(&state, id).await?;
    Ok(Json(ActorEnvelope {
        actor: actor.into(),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_actor(state: &AppState, id: DbId) -> AppResult<Actor> {
    ActorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "actor", id }))
}

async fn upload_avatar(state: &AppState, form: &mut FormData) -> AppResult<Option<UploadedMedia>> {
    match form.take_image("avatar")? {
        Some(file) => Ok(Some(
            state.media.upload_image(file, ImageTransform::Avatar).await?,
        )),
        None => Ok(None),
    }
}
