pub mod actor;
pub mod admin;
pub mod health;
pub mod movie;
pub mod review;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /user/create                                   sign up (public)
/// /user/verify-email                             verify with emailed code
/// /user/resend-email-verification-token          new verification code
/// /user/forgot-password                          mail a reset link
/// /user/verify-password-reset-token              check a reset link
/// /user/reset-password                           set a new password
/// /user/sign-in                                  sign in (public)
/// /user/is-auth                                  current user (requires auth)
///
/// /actor/create, /update/{id}, /{id}             manage actors (admin only)
/// /actor/search, /latest-uploads, /actors        browse actors (admin only)
/// /actor/single/{id}                             actor profile (public)
///
/// /movie/upload-trailer, /create                 upload (admin only)
/// /movie/update/{id}, /{id}                      update, delete (admin only)
/// /movie/movies, /for-update/{id}, /search       browse (admin only)
/// /movie/latest-uploads, /single/{id}            public catalog
/// /movie/related/{id}, /top-rated               public ranked lists
/// /movie/search-public                           public search
///
/// /review/add/{movie_id}                         add (verified users)
/// /review/{review_id}                            update, delete (owner only)
/// /review/get-reviews-by-movie/{movie_id}        list (public)
///
/// /admin/app-info, /most-rated                   dashboard (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user::router())
        .nest("/actor", actor::router())
        .nest("/movie", movie::router())
        .nest("/review", review::router())
        .nest("/admin", admin::router())
}

/// The multipart upload routes, also mounted under `/api`.
///
/// Kept apart from [`api_routes`] so they can carry a larger body limit
/// and a longer timeout.
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .nest("/actor", actor::uploads())
        .nest("/movie", movie::uploads())
}
