//! Route definitions for the `/movie` resource.

use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::movie;
use crate::state::AppState;

/// Routes mounted at `/movie`. Uploads live in [`uploads`].
///
/// ```text
/// DELETE /{id}            -> delete (admin)
/// GET    /movies          -> list (admin)
/// GET    /for-update/{id} -> for_update (admin)
/// GET    /search          -> search (admin)
/// GET    /latest-uploads  -> latest_uploads
/// GET    /single/{id}     -> get_single
/// GET    /related/{id}    -> related
/// GET    /top-rated       -> top_rated
/// GET    /search-public   -> search_public
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", delete(movie::delete))
        .route("/movies", get(movie::list))
        .route("/for-update/{id}", get(movie::for_update))
        .route("/search", get(movie::search))
        .route("/latest-uploads", get(movie::latest_uploads))
        .route("/single/{id}", get(movie::get_single))
        .route("/related/{id}", get(movie::related))
        .route("/top-rated", get(movie::top_rated))
        .route("/search-public", get(movie::search_public))
}

/// Multipart routes mounted at `/movie`.
///
/// ```text
/// POST   /upload-trailer  -> upload_trailer (admin)
/// POST   /create          -> create (admin)
/// PATCH  /update/{id}     -> update (admin)
/// ```
pub fn uploads() -> Router<AppState> {
    Router::new()
        .route("/upload-trailer", post(movie::upload_trailer))
        .route("/create", post(movie::create))
        .route("/update/{id}", patch(movie::update))
}
