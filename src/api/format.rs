//! Success envelope and pagination for the public wire format.
//!
//! Every 2xx response is `{ success: true, data, [pagination], [stats],
//! [message] }`; the error-side counterpart lives in `crate::error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::{json, Value};

/// Page descriptor computed from 1-indexed `page`/`limit` query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_items: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total_items: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_items.div_ceil(limit);
        Self {
            current_page: page,
            total_pages,
            total_items,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

/// Wrapper that renders the success envelope.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    status: StatusCode,
    pagination: Option<Pagination>,
    stats: Option<Value>,
    message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { data, status: StatusCode::OK, pagination: None, stats: None, message: None }
    }

    pub fn created(data: T) -> Self {
        Self { status: StatusCode::CREATED, ..Self::success(data) }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_stats(mut self, stats: Value) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize response data: {e}");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "success": false, "message": "Internal Server Error" })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "success": true,
            "data": data,
        });
        if let Some(pagination) = &self.pagination {
            envelope["pagination"] = json!(pagination);
        }
        if let Some(stats) = &self.stats {
            envelope["stats"] = stats.clone();
        }
        if let Some(message) = &self.message {
            envelope["message"] = json!(message);
        }

        (self.status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_three_pages() {
        let p = Pagination::new(1, 10, 25);
        assert_eq!(p.total_pages, 3);
        assert!(p.has_next);
        assert!(!p.has_prev);
    }

    #[test]
    fn last_partial_page() {
        let p = Pagination::new(3, 10, 25);
        assert!(!p.has_next);
        assert!(p.has_prev);
    }

    #[test]
    fn exact_multiple_has_no_phantom_page() {
        let p = Pagination::new(2, 10, 20);
        assert_eq!(p.total_pages, 2);
        assert!(!p.has_next);
    }

    #[test]
    fn empty_result_set() {
        let p = Pagination::new(1, 10, 0);
        assert_eq!(p.total_pages, 0);
        assert!(!p.has_next);
        assert!(!p.has_prev);
    }
}
