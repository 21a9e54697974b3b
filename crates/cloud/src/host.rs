//! The media host interface and its value types.

use async_trait::async_trait;
use serde::Serialize;

/// Avatar edge length in pixels.
const AVATAR_SIZE: u32 = 500;

/// Poster dimensions and responsive variants.
const POSTER_WIDTH: u32 = 1280;
const POSTER_HEIGHT: u32 = 720;
const POSTER_MAX_RESPONSIVE_WIDTH: u32 = 640;
const POSTER_MAX_RESPONSIVE_IMAGES: u32 = 3;

/// Errors from the media host layer.
#[derive(Debug, thiserror::Error)]
pub enum CloudError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host returned a non-2xx status code.
    #[error("Media host API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The host answered but did not report success, e.g. a destroy
    /// returning `"not found"`.
    #[error("Media host did not confirm the operation: {0}")]
    Rejected(String),

    /// Required configuration is missing or invalid.
    #[error("Media host configuration error: {0}")]
    Config(String),
}

/// Resource class of a hosted asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Server-side transformation applied to an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageTransform {
    /// Square face-focused thumbnail.
    Avatar,
    /// Fixed-size poster plus responsive width variants.
    Poster,
}

impl ImageTransform {
    /// Transformation string in the host's URL syntax.
    pub fn transformation(self) -> String {
        match self {
            Self::Avatar => format!("w_{AVATAR_SIZE},h_{AVATAR_SIZE},c_thumb,g_face"),
            Self::Poster => format!("w_{POSTER_WIDTH},h_{POSTER_HEIGHT}"),
        }
    }

    /// Responsive breakpoint request, if this transform produces variants.
    pub fn responsive_breakpoints(self) -> Option<String> {
        match self {
            Self::Avatar => None,
            Self::Poster => Some(
                serde_json::json!([{
                    "create_derived": true,
                    "max_width": POSTER_MAX_RESPONSIVE_WIDTH,
                    "max_images": POSTER_MAX_RESPONSIVE_IMAGES,
                }])
                .to_string(),
            ),
        }
    }
}

/// An uploaded file as received from a multipart request.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// What the host reports after a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedMedia {
    pub url: String,
    pub public_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub responsive: Vec<String>,
}

/// Hosted storage for images and videos.
#[async_trait]
pub trait MediaHost: Send + Sync {
    async fn upload_image(
        &self,
        file: MediaFile,
        transform: ImageTransform,
    ) -> Result<UploadedMedia, CloudError>;

    async fn upload_video(&self, file: MediaFile) -> Result<UploadedMedia, CloudError>;

    /// Remove an asset. Anything other than a confirmed deletion is an error.
    async fn destroy(&self, public_id: &str, kind: MediaKind) -> Result<(), CloudError>;
}
