//! Handlers for the `/user` resource: sign-up, email verification,
//! password reset, and sign-in.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use reelview_core::error::CoreError;
use reelview_core::token::{TokenPurpose, VerificationToken};
use reelview_core::types::DbId;
use reelview_db::models::user::{CreateUser, User, UserProfile};
use reelview_db::repositories::UserRepo;
use reelview_notify::templates;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{send_email, MessageResponse};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, validate_password_length, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

const EMAIL_IN_USE: &str = "This email is already in use!";
const SIGN_IN_MISMATCH: &str = "Email/Password mismatch!";
const INVALID_RESET: &str = "Unauthorized access, invalid request!";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "Name is missing!"))]
    pub name: String,
    #[validate(email(message = "Email is invalid!"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyEmailRequest {
    pub user_id: DbId,
    #[serde(alias = "OTP")]
    pub otp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendTokenRequest {
    pub user_id: DbId,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetTokenRequest {
    #[serde(default)]
    pub token: String,
    pub user_id: DbId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub new_password: String,
    #[serde(default)]
    pub token: String,
    pub user_id: DbId,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email(message = "Email is invalid!"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is missing!"))]
    pub password: String,
}

/// `{ "user": ... }` envelope.
#[derive(Debug, Serialize)]
pub struct UserEnvelope<T: Serialize> {
    pub user: T,
}

#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

/// A user together with a fresh access token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedInUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
    pub is_verified: bool,
}

#[derive(Debug, Serialize)]
pub struct VerifiedEmailResponse {
    pub user: SignedInUser,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ResetTokenStatus {
    pub valid: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/user/create
///
/// Register an unverified account and mail it a verification code.
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserEnvelope<CreatedUser>>)> {
    input.name = input.name.trim().to_string();
    input.email = normalize_email(&input.email);
    input.validate()?;
    validate_password_length(&input.password)?;

    if UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(EMAIL_IN_USE.into())));
    }

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash: hash_password(&input.password)?,
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered");

    let issued = state
        .tokens
        .issue(user.id, TokenPurpose::EmailVerification)
        .await?;
    send_email(
        &state,
        templates::email_verification(&user.email, &issued.plaintext),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            user: CreatedUser {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

/// POST /api/user/verify-email
///
/// Check the emailed code, mark the account verified, and sign the user in.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyEmailRequest>,
) -> AppResult<Json<VerifiedEmailResponse>> {
    let user = find_user(&state, input.user_id).await?;
    if user.is_verified {
        return Err(AppError::Core(CoreError::Conflict(
            "User is already verified!".into(),
        )));
    }

    let token = state
        .tokens
        .validate(user.id, TokenPurpose::EmailVerification, input.otp.trim())
        .await
        .map_err(|e| match e {
            CoreError::Unauthorized(_) => {
                AppError::Core(CoreError::Unauthorized("Please submit a valid OTP!".into()))
            }
            other => AppError::Core(other),
        })?;

    let user = UserRepo::mark_verified(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "user",
            id: input.user_id,
        }))?;
    state.tokens.consume(&token).await?;
    tracing::info!(user_id = user.id, "Email verified");

    send_email(&state, templates::welcome(&user.email, &user.name)).await;

    Ok(Json(VerifiedEmailResponse {
        user: signed_in(&state, &user)?,
        message: "Your email is verified.",
    }))
}

/// POST /api/user/resend-email-verification-token
pub async fn resend_email_verification_token(
    State(state): State<AppState>,
    Json(input): Json<ResendTokenRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let user = find_user(&state, input.user_id).await?;

    let issued = state
        .tokens
        .issue(user.id, TokenPurpose::EmailVerification)
        .await?;
    send_email(
        &state,
        templates::email_verification(&user.email, &issued.plaintext),
    )
    .await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "New OTP has been sent to your registered email account.",
        }),
    ))
}

/// POST /api/user/forgot-password
///
/// Mail a one-hour password reset link.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(input): Json<ForgotPasswordRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let email = normalize_email(&input.email);
    if email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Email is missing!".into(),
        )));
    }

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found!".into()))?;

    let issued = state
        .tokens
        .issue(user.id, TokenPurpose::PasswordReset)
        .await?;
    let link = state.config.password_reset_link(&issued.plaintext, user.id);
    send_email(&state, templates::password_reset_link(&user.email, &link)).await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Link sent to your email!",
        }),
    ))
}

/// POST /api/user/verify-password-reset-token
///
/// Lets the reset page check a link before showing the form.
pub async fn verify_password_reset_token(
    State(state): State<AppState>,
    Json(input): Json<ResetTokenRequest>,
) -> AppResult<Json<ResetTokenStatus>> {
    check_reset_token(&state, input.user_id, &input.token).await?;
    Ok(Json(ResetTokenStatus { valid: true }))
}

/// POST /api/user/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    validate_password_length(&input.new_password)?;
    let token = check_reset_token(&state, input.user_id, &input.token).await?;
    let user = find_user(&state, input.user_id).await?;

    if verify_password(&input.new_password, &user.password_hash)? {
        return Err(AppError::Core(CoreError::Validation(
            "The new password must be different from old one!".into(),
        )));
    }

    UserRepo::update_password(&state.pool, user.id, &hash_password(&input.new_password)?)
        .await?;
    state.tokens.consume(&token).await?;
    tracing::info!(user_id = user.id, "Password reset");

    send_email(&state, templates::password_changed(&user.email)).await;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Password reset successfully, now you can use new password.",
        }),
    ))
}

/// POST /api/user/sign-in
pub async fn sign_in(
    State(state): State<AppState>,
    Json(mut input): Json<SignInRequest>,
) -> AppResult<Json<UserEnvelope<SignedInUser>>> {
    input.email = normalize_email(&input.email);
    input.validate()?;

    let mismatch = || AppError::Core(CoreError::Unauthorized(SIGN_IN_MISMATCH.into()));

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(mismatch)?;
    if !verify_password(&input.password, &user.password_hash)? {
        return Err(mismatch());
    }

    tracing::info!(user_id = user.id, "User signed in");
    Ok(Json(UserEnvelope {
        user: signed_in(&state, &user)?,
    }))
}

/// GET /api/user/is-auth
///
/// The profile of the user behind the bearer token.
pub async fn is_auth(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<UserEnvelope<UserProfile>>> {
    let user = find_user(&state, auth.user_id).await?;
    Ok(Json(UserEnvelope {
        user: UserProfile::from(&user),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user", id }))
}

fn signed_in(state: &AppState, user: &User) -> AppResult<SignedInUser> {
    let token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation failed: {e}")))?;
    Ok(SignedInUser {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        role: user.role.clone(),
        token,
        is_verified: user.is_verified,
    })
}

/// Validate a password reset token without consuming it.
///
/// A missing token and a wrong token are reported the same way.
async fn check_reset_token(
    state: &AppState,
    user_id: DbId,
    token: &str,
) -> AppResult<VerificationToken> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Invalid request!".into(),
        )));
    }

    state
        .tokens
        .validate(user_id, TokenPurpose::PasswordReset, token)
        .await
        .map_err(|e| match e {
            CoreError::NotFound { .. } | CoreError::Unauthorized(_) => {
                AppError::Core(CoreError::Unauthorized(INVALID_RESET.into()))
            }
            other => AppError::Core(other),
        })
}
