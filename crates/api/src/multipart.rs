//! Buffered multipart forms.
//!
//! Admin uploads arrive as `multipart/form-data` with plain text fields,
//! JSON-encoded list/object fields, and at most one file per field name.
//! [`FormData::read`] drains the stream once so handlers can validate the
//! text before any media is sent to the host.

use std::collections::HashMap;

use axum::extract::Multipart;
use reelview_cloud::MediaFile;
use reelview_core::error::CoreError;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, MediaFile>,
}

impl FormData {
    pub async fn read(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = FormData::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            if name.is_empty() {
                continue;
            }

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    // Browsers send an empty part for an untouched file input.
                    if data.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        MediaFile {
                            file_name,
                            content_type,
                            bytes: data.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A text field, or `""` when absent.
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    /// Decode a JSON-encoded field. Absent or blank fields yield `None`.
    pub fn json<T: DeserializeOwned>(&self, name: &str, message: &str) -> AppResult<Option<T>> {
        match self.fields.get(name).map(|v| v.trim()) {
            None | Some("") => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|_| AppError::Core(CoreError::Validation(message.to_string()))),
        }
    }

    /// Remove an uploaded image, rejecting other media types.
    pub fn take_image(&mut self, name: &str) -> AppResult<Option<MediaFile>> {
        self.take_with_prefix(name, "image/", "Supports only image files!")
    }

    /// Remove an uploaded video, rejecting other media types.
    pub fn take_video(&mut self, name: &str) -> AppResult<Option<MediaFile>> {
        self.take_with_prefix(name, "video/", "Supports only video files!")
    }

    fn take_with_prefix(
        &mut self,
        name: &str,
        prefix: &str,
        message: &str,
    ) -> AppResult<Option<MediaFile>> {
        let Some(file) = self.files.remove(name) else {
            return Ok(None);
        };
        let accepted = file
            .content_type
            .as_deref()
            .is_some_and(|mime| mime.starts_with(prefix));
        if !accepted {
            return Err(AppError::Core(CoreError::Validation(message.to_string())));
        }
        Ok(Some(file))
    }
}
