//! Route definitions for the `/actor` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::actor;
use crate::state::AppState;

/// Routes mounted at `/actor`. Uploads live in [`uploads`].
///
/// ```text
/// DELETE /{id}            -> delete (admin)
/// GET    /search          -> search (admin)
/// GET    /latest-uploads  -> latest_uploads (admin)
/// GET    /actors          -> list (admin)
/// GET    /single/{id}     -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(actor::delete))
        .route("/search", get(actor::search))
        .route("/latest-uploads", get(actor::latest_uploads))
        .route("/actors", get(actor::list))
        .route("/single/{id}", get(actor::get_by_id))
}

/// Multipart routes mounted at `/actor`.
///
/// ```text
/// POST   /create          -> create (admin)
/// POST   /update/{id}     -> update (admin)
/// ```
pub fn uploads() -> Router<AppState> {
    Router::new()
        .route("/create", post(actor::create))
        .route("/update/{id}", post(actor::update))
}
