//! Actor entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use reelview_core::types::{DbId, Timestamp};

/// A row from the `actors` table.
#[derive(Debug, Clone, FromRow)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar_url: Option<String>,
    pub avatar_public_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Actor as returned by the API; `avatar` is the image URL.
#[derive(Debug, Clone, Serialize)]
pub struct ActorResponse {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar: Option<String>,
}

impl From<Actor> for ActorResponse {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.id,
            name: actor.name,
            about: actor.about,
            gender: actor.gender,
            avatar: actor.avatar_url,
        }
    }
}

/// DTO for creating an actor.
#[derive(Debug, Clone)]
pub struct CreateActor {
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar_url: Option<String>,
    pub avatar_public_id: Option<String>,
}

/// DTO for updating an actor.
///
/// Text fields are replaced; the avatar columns change only when a new
/// avatar is supplied.
#[derive(Debug, Clone)]
pub struct UpdateActor {
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar_url: Option<String>,
    pub avatar_public_id: Option<String>,
}
