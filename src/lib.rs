//! Two-sided marketplace backend: auth, product CRUD and seller dashboards
//! behind a uniform JSON envelope.

use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod middleware;
pub mod state;
pub mod store;
pub mod validation;

use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(product_routes())
        // Unknown routes still answer with the error envelope
        .fallback(route_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(axum::middleware::from_fn(middleware::envelope_method_not_allowed)),
        )
        .with_state(state)
}

fn auth_routes() -> Router<AppState> {
    use handlers::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
}

fn product_routes() -> Router<AppState> {
    use handlers::products;

    Router::new()
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/seller", get(products::seller_dashboard))
        .route(
            "/api/products/:id",
            get(products::show).put(products::update).delete(products::destroy),
        )
}

async fn root() -> axum::response::Json<serde_json::Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Marketplace API",
            "version": version,
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/register, /api/auth/login (public), /api/auth/me (protected)",
                "products": "/api/products[/:id] (public read, seller write)",
                "seller": "/api/products/seller (seller)",
            }
        }
    }))
}

async fn health() -> axum::response::Json<serde_json::Value> {
    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}

async fn route_not_found() -> error::ApiError {
    error::ApiError::not_found("Route")
}
