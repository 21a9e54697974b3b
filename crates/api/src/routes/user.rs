//! Route definitions for the `/user` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(user::create))
        .route("/verify-email", post(user::verify_email))
        .route(
            "/resend-email-verification-token",
            post(user::resend_email_verification_token),
        )
        .route("/forgot-password", post(user::forgot_password))
        .route(
            "/verify-password-reset-token",
            post(user::verify_password_reset_token),
        )
        .route("/reset-password", post(user::reset_password))
        .route("/sign-in", post(user::sign_in))
        .route("/is-auth", get(user::is_auth))
}
