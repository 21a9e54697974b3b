//! Media hosting for actor avatars, movie posters and trailers.
//!
//! [`MediaHost`] is the seam the API depends on; [`CloudinaryHost`] talks
//! to the hosted image/video service over its signed REST upload API.

pub mod cloudinary;
pub mod host;

pub use cloudinary::{CloudinaryConfig, CloudinaryHost};
pub use host::{CloudError, ImageTransform, MediaFile, MediaHost, MediaKind, UploadedMedia};
