//! Cross-cutting response hygiene.

use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// Router-level 405s carry an empty body; rewrap them so every non-2xx
/// response matches the error envelope.
pub async fn envelope_method_not_allowed(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut replacement = (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "success": false, "message": "Method not allowed" })),
    )
        .into_response();
    if let Some(allow) = allow {
        replacement.headers_mut().insert(header::ALLOW, allow);
    }
    replacement
}
