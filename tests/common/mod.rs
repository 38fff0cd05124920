#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{ensure, Result};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use marketplace_api::images::PassthroughUploader;
use marketplace_api::state::AppState;
use marketplace_api::store::memory::MemoryStore;

/// In-process application over a fresh in-memory store. Requests are driven
/// through the router directly; no listening socket is involved.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_app() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        users: store.clone(),
        products: store.clone(),
        uploader: Arc::new(PassthroughUploader),
    };
    TestApp { router: marketplace_api::app(state), store }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let raw = body.map(|b| serde_json::to_string(&b)).transpose()?;
        self.request_raw(method, path, token, raw.as_deref()).await
    }

    /// Raw-body variant for malformed-payload scenarios.
    pub async fn request_raw(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    /// Register an account and hand back (user id, token).
    pub async fn register(&self, name: &str, email: &str, role: &str) -> Result<(String, String)> {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "hunter22",
                    "role": role,
                })),
            )
            .await?;
        ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");
        Ok((
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        ))
    }

    /// Create a product through the API and hand back its record.
    pub async fn create_product(&self, token: &str, payload: Value) -> Result<Value> {
        let (status, body) = self.request("POST", "/api/products", Some(token), Some(payload)).await?;
        ensure!(status == StatusCode::CREATED, "create product failed: {status} {body}");
        Ok(body["data"].clone())
    }
}

/// Valid create-product payload with the fields tests most often vary.
pub fn product_payload(name: &str, price: f64, stock: i64) -> Value {
    json!({
        "name": name,
        "description": "Sturdy, well made, ships in recyclable packaging.",
        "price": price,
        "category": "general",
        "stock": stock,
        "images": ["https://cdn.example.com/item.jpg"],
    })
}
