//! Image-upload collaborator seam.
//!
//! Controllers hand raw image payloads (data URLs or remote references) to an
//! `ImageUploader` and persist only the durable URLs it returns.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("invalid image payload")]
    InvalidImage,

    #[error("upload service rejected the request: {0}")]
    Rejected(String),

    #[error("upload service unreachable: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload one image and return its durable URL.
    async fn upload(&self, image: &str) -> Result<String, UploadError>;
}

/// HTTP uploader posting to an external service that answers with a durable
/// `secure_url` for each accepted image.
#[derive(Debug, Clone)]
pub struct HttpImageUploader {
    client: reqwest::Client,
    endpoint: Url,
    folder: String,
}

impl HttpImageUploader {
    pub fn new(endpoint: Url, folder: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), endpoint, folder: folder.into() }
    }
}

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, image: &str) -> Result<String, UploadError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "file": image, "folder": self.folder }))
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(UploadError::InvalidImage);
        }
        if !status.is_success() {
            return Err(UploadError::Rejected(format!("status {status}")));
        }

        let body: serde_json::Value =
            response.json().await.map_err(|e| UploadError::Transport(e.to_string()))?;
        body.get("secure_url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| UploadError::Rejected("response missing secure_url".into()))
    }
}

/// Development fallback when no upload endpoint is configured: hands the
/// caller-supplied reference back unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughUploader;

#[async_trait]
impl ImageUploader for PassthroughUploader {
    async fn upload(&self, image: &str) -> Result<String, UploadError> {
        if image.trim().is_empty() {
            return Err(UploadError::InvalidImage);
        }
        Ok(image.to_string())
    }
}
