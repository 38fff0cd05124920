//! Domain error taxonomy and the single normalization funnel.
//!
//! Every failure a controller can raise converges here before becoming an
//! HTTP response, and every response rendered here matches the uniform error
//! envelope `{ success: false, message, [errors] }`. Low-level failures from
//! the store, the token library, and the upload service are classified by the
//! `From` impls below; anything unrecognized becomes `Internal` with a
//! generic client-facing message.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde_json::{json, Value};

use crate::images::UploadError;
use crate::is_development;
use crate::store::StoreError;
use crate::validation::Violation;

#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation { message: String, errors: Vec<Violation> },

    // 401 Unauthorized
    Authentication(String),

    // 403 Forbidden
    Authorization(String),

    // 404 Not Found
    NotFound { resource: String },

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    Internal { detail: Option<String> },
}

impl ApiError {
    pub fn validation(errors: Vec<Violation>) -> Self {
        ApiError::Validation { message: "Validation Error".into(), errors }
    }

    pub fn validation_message(message: impl Into<String>) -> Self {
        ApiError::Validation { message: message.into(), errors: Vec::new() }
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        ApiError::Authentication(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        ApiError::Authorization(message.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        ApiError::NotFound { resource: resource.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal { detail: Some(detail.into()) }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ApiError::Authorization(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-safe message. `Internal` never leaks its detail here.
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Authentication(message) => message.clone(),
            ApiError::Authorization(message) => message.clone(),
            ApiError::NotFound { resource } => format!("{resource} not found"),
            ApiError::Conflict(message) => message.clone(),
            ApiError::Internal { .. } => "Internal Server Error".into(),
        }
    }

    /// Render the uniform error envelope. Diagnostic detail is attached in
    /// development mode only.
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "success": false,
            "message": self.message(),
        });
        if let ApiError::Validation { errors, .. } = self {
            if !errors.is_empty() {
                body["errors"] = json!(errors);
            }
        }
        if is_development!() {
            if let ApiError::Internal { detail: Some(detail) } = self {
                body["debug"] = json!(detail);
            }
        }
        body
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateKey { field } => {
                ApiError::conflict(format!("{field} already exists"))
            }
            // An unparseable id reads as a missing resource, not a client
            // format error: id syntax is a storage detail.
            StoreError::InvalidId(_) => ApiError::not_found("Resource"),
            StoreError::FieldValidation(errors) => {
                let message = errors
                    .iter()
                    .map(|v| v.message.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                ApiError::Validation { message, errors }
            }
            StoreError::NotFound { resource } => ApiError::not_found(resource),
            StoreError::Backend(detail) => ApiError::internal(detail),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                ApiError::authentication("Token expired")
            }
            _ => ApiError::authentication("Invalid token"),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidImage => {
                ApiError::validation_message("Invalid image format or size")
            }
            UploadError::Rejected(detail) | UploadError::Transport(detail) => {
                ApiError::Internal { detail: Some(format!("image upload failed: {detail}")) }
            }
        }
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::internal(format!("password hashing failed: {err}"))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(_: JsonRejection) -> Self {
        ApiError::validation_message("Invalid JSON payload")
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match &self {
            ApiError::Internal { detail } => {
                tracing::error!(detail = detail.as_deref().unwrap_or("unknown"), "request failed");
            }
            other => {
                tracing::debug!(status = %other.status_code(), "{}", other.message());
            }
        }
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
