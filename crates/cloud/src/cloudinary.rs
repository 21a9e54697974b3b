//! Signed REST client for the hosted media service.
//!
//! Uploads go to `POST {base}/{resource}/upload` as multipart forms and
//! deletions to `POST {base}/{resource}/destroy`. Every request carries a
//! timestamp and a SHA-256 signature over the sorted parameters plus the
//! API secret.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::host::{CloudError, ImageTransform, MediaFile, MediaHost, MediaKind, UploadedMedia};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// HTTP timeout for a single upload or destroy call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Account credentials for the media host.
///
/// | Env var            | Required |
/// |--------------------|----------|
/// | `CLOUD_NAME`       | yes      |
/// | `CLOUD_API_KEY`    | yes      |
/// | `CLOUD_API_SECRET` | yes      |
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudinaryConfig {
    pub fn from_env() -> Result<Self, CloudError> {
        let var = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or_else(|| CloudError::Config(format!("{name} must be set")))
        };
        Ok(Self {
            cloud_name: var("CLOUD_NAME")?,
            api_key: var("CLOUD_API_KEY")?,
            api_secret: var("CLOUD_API_SECRET")?,
            api_base: DEFAULT_API_BASE.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    responsive_breakpoints: Vec<BreakpointSet>,
}

#[derive(Debug, Deserialize)]
struct BreakpointSet {
    #[serde(default)]
    breakpoints: Vec<Breakpoint>,
}

#[derive(Debug, Deserialize)]
struct Breakpoint {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// [`MediaHost`] backed by the hosted media service.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Result<Self, CloudError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, kind: MediaKind, action: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.config.api_base,
            self.config.cloud_name,
            kind.as_str(),
            action
        )
    }

    /// Add `timestamp`, `api_key` and `signature` to `params`.
    fn signed(&self, mut params: BTreeMap<&'static str, String>) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("api_key", self.config.api_key.clone());
        params.insert("signature", signature);
        params
    }

    async fn upload(
        &self,
        kind: MediaKind,
        file: MediaFile,
        params: BTreeMap<&'static str, String>,
    ) -> Result<UploadedMedia, CloudError> {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = file.content_type.as_deref() {
            part = part.mime_str(mime)?;
        }

        let form = self
            .signed(params)
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v))
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint(kind, "upload"))
            .multipart(form)
            .send()
            .await?;
        let body: UploadResponse = Self::ensure_success(response).await?.json().await?;

        tracing::info!(public_id = %body.public_id, kind = kind.as_str(), "Media uploaded");

        Ok(UploadedMedia {
            url: body.secure_url,
            public_id: body.public_id,
            responsive: body
                .responsive_breakpoints
                .into_iter()
                .flat_map(|set| set.breakpoints)
                .map(|b| b.secure_url)
                .collect(),
        })
    }

    // ---- private helpers ----

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CloudError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
    async fn upload_image(
        &self,
        file: MediaFile,
        transform: ImageTransform,
    ) -> Result<UploadedMedia, CloudError> {
        let mut params = BTreeMap::new();
        params.insert("transformation", transform.transformation());
        if let Some(breakpoints) = transform.responsive_breakpoints() {
            params.insert("responsive_breakpoints", breakpoints);
        }
        self.upload(MediaKind::Image, file, params).await
    }

    async fn upload_video(&self, file: MediaFile) -> Result<UploadedMedia, CloudError> {
        self.upload(MediaKind::Video, file, BTreeMap::new()).await
    }

    async fn destroy(&self, public_id: &str, kind: MediaKind) -> Result<(), CloudError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());

        let response = self
            .client
            .post(self.endpoint(kind, "destroy"))
            .form(&self.signed(params))
            .send()
            .await?;
        let body: DestroyResponse = Self::ensure_success(response).await?.json().await?;

        if body.result != "ok" {
            tracing::warn!(public_id, result = %body.result, "Media destroy not confirmed");
            return Err(CloudError::Rejected(body.result));
        }
        tracing::info!(public_id, kind = kind.as_str(), "Media destroyed");
        Ok(())
    }
}

/// The `k=v&k=v` string the signature covers, keys in sorted order.
fn string_to_sign(params: &BTreeMap<&'static str, String>) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Hex SHA-256 of the parameter string followed by the API secret.
fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(string_to_sign(params).as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}
