//! HTTP-level integration tests for the `/api/user` account endpoints.
//!
//! Covers signup with email verification, sign-in, the password reset
//! flow, and the one-live-token rule.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json, TestApp};
use reelview_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sign up through the API and return the new user's id.
async fn sign_up(app: &TestApp, name: &str, email: &str) -> i64 {
    let body = json!({ "name": name, "email": email, "password": common::PASSWORD });
    let response = post_json(app.app(), "/api/user/create", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["user"]["id"].as_i64().unwrap()
}

async fn sign_in(app: &TestApp, email: &str, password: &str) -> axum::response::Response {
    post_json(
        app.app(),
        "/api/user/sign-in",
        json!({ "email": email, "password": password }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Signup and verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_returns_user_and_mails_code(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "name": " Ana ", "email": "Ana@Example.com", "password": "password123" });
    let response = post_json(app.app(), "/api/user/create", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["user"]["name"], "Ana");
    assert_eq!(json["user"]["email"], "ana@example.com");
    assert!(json["user"].get("password").is_none());

    let email = app.mailer.last_to("ana@example.com");
    assert_eq!(email.subject, "Email Verification");
    let otp = common::otp_from(&email);
    assert_eq!(otp.len(), 6);
    assert!(otp.chars().all(|c| c.is_ascii_digit()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_email_signs_user_in(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user_id = sign_up(&app, "Ana", "ana@example.com").await;
    let otp = common::otp_from(&app.mailer.last_to("ana@example.com"));

    let response = post_json(
        app.app(),
        "/api/user/verify-email",
        json!({ "userId": user_id, "OTP": otp }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Your email is verified.");
    assert_eq!(json["user"]["isVerified"], true);
    assert_eq!(json["user"]["role"], "user");
    let token = json["user"]["token"].as_str().unwrap().to_string();

    assert_eq!(app.mailer.last_to("ana@example.com").subject, "Welcome Email");
    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert!(user.is_verified);

    // The issued token works on protected routes.
    let response = get_auth(app.app(), "/api/user/is-auth", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user_id);
    assert_eq!(json["user"]["email"], "ana@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_email_rejects_wrong_code(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let user_id = sign_up(&app, "Ana", "ana@example.com").await;
    let otp = common::otp_from(&app.mailer.last_to("ana@example.com"));
    let wrong = if otp == "000000" { "111111" } else { "000000" };

    let response = post_json(
        app.app(),
        "/api/user/verify-email",
        json!({ "userId": user_id, "otp": wrong }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Please submit a valid OTP!");

    let user = UserRepo::find_by_id(&pool, user_id).await.unwrap().unwrap();
    assert!(!user.is_verified);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_email_twice_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = sign_up(&app, "Ana", "ana@example.com").await;
    let otp = common::otp_from(&app.mailer.last_to("ana@example.com"));
    let body = json!({ "userId": user_id, "otp": otp });

    let first = post_json(app.app(), "/api/user/verify-email", body.clone()).await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = post_json(app.app(), "/api/user/verify-email", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let json = body_json(second).await;
    assert_eq!(json["error"], "User is already verified!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_rejects_duplicate_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    sign_up(&app, "Ana", "ana@example.com").await;

    let body = json!({ "name": "Other", "email": "ANA@example.com", "password": "password123" });
    let response = post_json(app.app(), "/api/user/create", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "This email is already in use!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_validates_fields(pool: PgPool) {
    let app = common::build_test_app(pool);

    let short = json!({ "name": "Ana", "email": "ana@example.com", "password": "short" });
    let response = post_json(app.app(), "/api/user/create", short).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Password must be 8 to 20 characters long!");

    let bad_email = json!({ "name": "Ana", "email": "not-an-email", "password": "password123" });
    let response = post_json(app.app(), "/api/user/create", bad_email).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Email is invalid!");

    let no_name = json!({ "name": "  ", "email": "ana@example.com", "password": "password123" });
    let response = post_json(app.app(), "/api/user/create", no_name).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Name is missing!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resend_while_code_is_live_conflicts(pool: PgPool) {
    let app = common::build_test_app(pool);
    let user_id = sign_up(&app, "Ana", "ana@example.com").await;

    let response = post_json(
        app.app(),
        "/api/user/resend-email-verification-token",
        json!({ "userId": user_id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Only after one hour you can request another token!"
    );
    assert_eq!(app.mailer.sent().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resend_for_verified_user_conflicts(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/user/resend-email-verification-token",
        json!({ "userId": user.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "User is already verified!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resend_after_expiry_mails_new_code(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", false).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/user/resend-email-verification-token",
        json!({ "userId": user.id }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "New OTP has been sent to your registered email account."
    );
    assert_eq!(app.mailer.last_to("bo@test.com").subject, "Email Verification");
}

// ---------------------------------------------------------------------------
// Sign-in
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_in_returns_token(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);

    let response = sign_in(&app, "BO@test.com", common::PASSWORD).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["isVerified"], true);
    assert!(json["user"]["token"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sign_in_mismatch_is_401(pool: PgPool) {
    common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);

    let wrong_password = sign_in(&app, "bo@test.com", "wrong-password").await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(wrong_password).await;
    assert_eq!(json["error"], "Email/Password mismatch!");

    // Unknown email looks the same.
    let unknown = sign_in(&app, "nobody@test.com", common::PASSWORD).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(unknown).await;
    assert_eq!(json["error"], "Email/Password mismatch!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_is_auth_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.app(), "/api/user/is-auth").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get_auth(app.app(), "/api/user/is-auth", "not-a-jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Password reset
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_password_reset_flow(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.app(),
        "/api/user/forgot-password",
        json!({ "email": "bo@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["message"], "Link sent to your email!");

    let email = app.mailer.last_to("bo@test.com");
    assert_eq!(email.subject, "Reset Password Link");
    assert!(email
        .html
        .contains("http://localhost:3000/auth/reset-password?token="));
    let token = common::reset_token_from(&email);

    // The link checks out before the form is shown.
    let response = post_json(
        app.app(),
        "/api/user/verify-password-reset-token",
        json!({ "token": token, "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["valid"], true);

    // Reusing the old password is refused and leaves the token live.
    let response = post_json(
        app.app(),
        "/api/user/reset-password",
        json!({ "newPassword": common::PASSWORD, "token": token, "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "The new password must be different from old one!"
    );

    let response = post_json(
        app.app(),
        "/api/user/reset-password",
        json!({ "newPassword": "brand-new-pass", "token": token, "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        body_json(response).await["message"],
        "Password reset successfully, now you can use new password."
    );
    assert_eq!(
        app.mailer.last_to("bo@test.com").subject,
        "Password Reset Successfully"
    );

    assert_eq!(
        sign_in(&app, "bo@test.com", common::PASSWORD).await.status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        sign_in(&app, "bo@test.com", "brand-new-pass").await.status(),
        StatusCode::OK
    );

    // The token was consumed.
    let response = post_json(
        app.app(),
        "/api/user/verify-password-reset-token",
        json!({ "token": token, "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(response).await["error"],
        "Unauthorized access, invalid request!"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_reset_request_within_hour_conflicts(pool: PgPool) {
    common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);
    let body = json!({ "email": "bo@test.com" });

    let first = post_json(app.app(), "/api/user/forgot-password", body.clone()).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = post_json(app.app(), "/api/user/forgot-password", body).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(app.mailer.sent().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_forgot_password_input_errors(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.app(), "/api/user/forgot-password", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Email is missing!");

    let response = post_json(
        app.app(),
        "/api/user/forgot-password",
        json!({ "email": "ghost@test.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], "User not found!");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_reset_token_checks(pool: PgPool) {
    let user = common::create_user(&pool, "Bo", true).await;
    let app = common::build_test_app(pool);

    // No live token at all.
    let response = post_json(
        app.app(),
        "/api/user/verify-password-reset-token",
        json!({ "token": "abcdef", "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Blank token.
    let response = post_json(
        app.app(),
        "/api/user/verify-password-reset-token",
        json!({ "token": " ", "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Invalid request!");

    // Live token, wrong value.
    post_json(
        app.app(),
        "/api/user/forgot-password",
        json!({ "email": "bo@test.com" }),
    )
    .await;
    let response = post_json(
        app.app(),
        "/api/user/verify-password-reset-token",
        json!({ "token": "definitely-wrong", "userId": user.id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
