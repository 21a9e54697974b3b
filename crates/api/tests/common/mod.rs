#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use reelview_api::auth::jwt::{generate_access_token, JwtConfig};
use reelview_api::auth::password::hash_password;
use reelview_api::config::ServerConfig;
use reelview_api::router::build_app_router;
use reelview_api::state::AppState;
use reelview_cloud::{CloudError, ImageTransform, MediaFile, MediaHost, MediaKind, UploadedMedia};
use reelview_core::roles::ROLE_ADMIN;
use reelview_core::types::DbId;
use reelview_db::models::actor::{Actor, CreateActor};
use reelview_db::models::movie::{Movie, MovieInput};
use reelview_db::models::review::CreateReview;
use reelview_db::models::user::{CreateUser, User};
use reelview_db::repositories::{ActorRepo, MovieRepo, ReviewRepo, UserRepo};
use reelview_notify::{EmailError, Mailer, OutboundEmail};

pub const PASSWORD: &str = "password123";

/// Build a test `ServerConfig` with safe defaults.
/// Upload body limit used by the test router. Above axum's 2 MB default.
pub const UPLOAD_LIMIT: usize = 8 * 1024 * 1024;

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: UPLOAD_LIMIT,
        upload_timeout_secs: 300,
        frontend_url: "http://localhost:3000".to_string(),
        token_sweep_interval_secs: 300,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// In-memory media host. Uploads get sequential public ids; destroys are
/// recorded and can be made to fail.
#[derive(Default)]
pub struct StubMediaHost {
    uploads: AtomicUsize,
    fail_destroy: AtomicBool,
    destroyed: Mutex<Vec<(String, MediaKind)>>,
}

impl StubMediaHost {
    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }

    pub fn fail_destroys(&self) {
        self.fail_destroy.store(true, Ordering::SeqCst);
    }

    pub fn destroyed(&self) -> Vec<(String, MediaKind)> {
        self.destroyed.lock().unwrap().clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}{n}")
    }
}

#[async_trait]
impl MediaHost for StubMediaHost {
    async fn upload_image(
        &self,
        _file: MediaFile,
        transform: ImageTransform,
    ) -> Result<UploadedMedia, CloudError> {
        let public_id = self.next_id("img");
        let url = format!("https://media.test/image/upload/v1/{public_id}.png");
        let responsive = match transform {
            ImageTransform::Poster => vec![
                format!("https://media.test/image/upload/w_640/{public_id}.png"),
                format!("https://media.test/image/upload/w_320/{public_id}.png"),
            ],
            ImageTransform::Avatar => Vec::new(),
        };
        Ok(UploadedMedia {
            url,
            public_id,
            responsive,
        })
    }

    async fn upload_video(&self, _file: MediaFile) -> Result<UploadedMedia, CloudError> {
        let public_id = self.next_id("vid");
        Ok(UploadedMedia {
            url: format!("https://media.test/video/upload/v1/{public_id}.mp4"),
            public_id,
            responsive: Vec::new(),
        })
    }

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> Result<(), CloudError> {
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(CloudError::Rejected("not found".into()));
        }
        self.destroyed
            .lock()
            .unwrap()
            .push((public_id.to_string(), kind));
        Ok(())
    }
}

/// Captures every email instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// The most recent email to `to`.
    pub fn last_to(&self, to: &str) -> OutboundEmail {
        self.sent()
            .into_iter()
            .rev()
            .find(|e| e.to == to)
            .unwrap_or_else(|| panic!("no email sent to {to}"))
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// The code between `<h1>` tags of a verification email.
pub fn otp_from(email: &OutboundEmail) -> String {
    let start = email.html.find("<h1>").expect("code heading") + "<h1>".len();
    let end = email.html[start..].find("</h1>").expect("code heading end") + start;
    email.html[start..end].to_string()
}

/// The `token` query parameter of a password reset email.
pub fn reset_token_from(email: &OutboundEmail) -> String {
    let start = email.html.find("token=").expect("reset link") + "token=".len();
    let end = email.html[start..].find("&amp;").expect("reset link id") + start;
    email.html[start..end].to_string()
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub config: ServerConfig,
    pub media: Arc<StubMediaHost>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    /// A bearer token for `user`.
    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &user.role, &self.config.jwt)
            .expect("token generation should succeed")
    }
}

/// Build the full application router, using the given database pool and
/// in-memory media host and mailer.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let config = test_config();
    let media = Arc::new(StubMediaHost::default());
    let mailer = Arc::new(RecordingMailer::default());

    let state = AppState::new(
        pool.clone(),
        Arc::new(config.clone()),
        media.clone(),
        mailer.clone(),
    );

    TestApp {
        router: build_app_router(state, &config),
        pool,
        config,
        media,
        mailer,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with password [`PASSWORD`].
pub async fn create_user(pool: &PgPool, name: &str, verified: bool) -> User {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: name.to_string(),
            email: format!("{}@test.com", name.to_lowercase()),
            password_hash: hash_password(PASSWORD).unwrap(),
        },
    )
    .await
    .unwrap();
    if verified {
        UserRepo::mark_verified(pool, user.id).await.unwrap().unwrap()
    } else {
        user
    }
}

pub async fn create_admin(pool: &PgPool) -> User {
    let user = create_user(pool, "Admin", true).await;
    UserRepo::set_role(pool, user.id, ROLE_ADMIN).await.unwrap();
    UserRepo::find_by_id(pool, user.id).await.unwrap().unwrap()
}

pub async fn create_actor(pool: &PgPool, name: &str) -> Actor {
    ActorRepo::create(
        pool,
        &CreateActor {
            name: name.to_string(),
            about: "About".to_string(),
            gender: "female".to_string(),
            avatar_url: None,
            avatar_public_id: None,
        },
    )
    .await
    .unwrap()
}

pub fn movie_input(title: &str, status: &str, content_type: &str, tags: &[&str]) -> MovieInput {
    MovieInput {
        title: title.to_string(),
        story_line: "A story".to_string(),
        director_id: None,
        writers: vec![],
        cast: vec![],
        release_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        status: status.to_string(),
        content_type: content_type.to_string(),
        genres: vec!["Drama".to_string()],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        language: "English".to_string(),
        trailer_url: format!("https://media.test/video/upload/v1/{}.mp4", slug(title)),
        trailer_public_id: slug(title),
        poster: None,
    }
}

fn slug(title: &str) -> String {
    title.to_lowercase().replace(' ', "-")
}

pub async fn create_movie(pool: &PgPool, title: &str, status: &str, tags: &[&str]) -> Movie {
    MovieRepo::create(pool, &movie_input(title, status, "Film", tags))
        .await
        .unwrap()
}

/// Give `movie_id` one review per rating, each from a fresh user.
pub async fn add_reviews(pool: &PgPool, movie_id: DbId, ratings: &[f64]) {
    for (i, rating) in ratings.iter().enumerate() {
        let owner = create_user(pool, &format!("Reviewer{movie_id}x{i}"), true).await;
        ReviewRepo::create(
            pool,
            &CreateReview {
                owner_id: owner.id,
                movie_id,
                content: String::new(),
                rating: *rating,
            },
        )
        .await
        .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, None)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::GET, uri, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, empty_request(Method::DELETE, uri, Some(token))).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "reelview-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// A small PNG-typed file part.
pub fn image_part<'a>(name: &'a str) -> Part<'a> {
    Part::File {
        name,
        file_name: "image.png",
        content_type: "image/png",
        bytes: b"\x89PNG fake",
    }
}
