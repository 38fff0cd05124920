//! Product catalogue and seller dashboard endpoints.
//!
//! Controllers orchestrate only: sanitize, validate, authenticate, confirm
//! existence, authorize, persist. All failures propagate to the error
//! normalizer.

use std::collections::HashMap;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use futures::future::try_join_all;
use serde_json::{json, Value};

use crate::api::format::{ApiResponse, ApiResult, Pagination};
use crate::auth::guard::Principal;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store;
use crate::store::models::{NewProduct, ProductPatch, ProductStatus};
use crate::validation::{self, product as schemas};

/// GET /api/products - public storefront listing: paginated, filterable by
/// category / price range / text search, only active products.
pub async fn list(
    State(state): State<AppState>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> ApiResult<Value> {
    let Query(params) = params.map_err(|_| ApiError::validation_message("Invalid query string"))?;
    let mut raw = Value::Object(
        params.into_iter().map(|(k, v)| (k, Value::String(v))).collect(),
    );
    validation::sanitize(&mut raw);
    let mut query = schemas::list_query(&raw).map_err(ApiError::validation)?;
    query.status = Some(ProductStatus::Active);

    let page = state.products.list_products(&query).await?;
    let pagination = Pagination::new(query.page, query.limit, page.total);
    Ok(ApiResponse::success(json!(page.items)).with_pagination(pagination))
}

/// POST /api/products - sellers only. Images are uploaded before the record
/// is persisted; only durable URLs are stored.
pub async fn create(
    State(state): State<AppState>,
    principal: Principal,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    principal.require_seller()?;
    let Json(mut payload) = payload?;
    validation::sanitize(&mut payload);
    let form = schemas::create(&payload).map_err(ApiError::validation)?;

    let images = upload_all(&state, &form.images).await?;
    let product = state
        .products
        .create_product(NewProduct {
            name: form.name,
            description: form.description,
            price: form.price,
            category: form.category,
            stock: form.stock,
            images,
            seller: principal.id,
            status: ProductStatus::Active,
        })
        .await?;

    tracing::info!(product = %product.id, seller = %principal.id, "created product");
    Ok(ApiResponse::created(json!(product)))
}

/// GET /api/products/:id - single product. Malformed ids fall through
/// `parse_id` and read as NotFound.
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let id = store::parse_id(&id)?;
    let product = state
        .products
        .product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    Ok(ApiResponse::success(json!(product)))
}

/// PUT /api/products/:id - partial update, owner only.
pub async fn update(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let id = store::parse_id(&id)?;
    let Json(mut payload) = payload?;
    validation::sanitize(&mut payload);
    let form = schemas::update(&payload).map_err(ApiError::validation)?;

    // Existence before ownership: a missing product must read as NotFound.
    let existing = state
        .products
        .product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    principal.require_owner(existing.seller, "update")?;

    let images = match &form.images {
        Some(images) => Some(upload_all(&state, images).await?),
        None => None,
    };
    let product = state
        .products
        .update_product(
            id,
            ProductPatch {
                name: form.name,
                description: form.description,
                price: form.price,
                category: form.category,
                stock: form.stock,
                images,
                status: form.status,
            },
        )
        .await?;

    Ok(ApiResponse::success(json!(product)))
}

/// DELETE /api/products/:id - hard delete, owner only.
pub async fn destroy(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = store::parse_id(&id)?;
    let existing = state
        .products
        .product_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product"))?;
    principal.require_owner(existing.seller, "delete")?;

    state.products.delete_product(id).await?;
    tracing::info!(product = %id, seller = %principal.id, "deleted product");
    Ok(ApiResponse::success(Value::Null).with_message("Product deleted successfully"))
}

/// GET /api/products/seller - the seller's own listings plus aggregate stats.
pub async fn seller_dashboard(
    State(state): State<AppState>,
    principal: Principal,
) -> ApiResult<Value> {
    principal.require_seller()?;
    let products = state.products.products_by_seller(principal.id).await?;
    let stats = state.products.seller_stats(principal.id).await?;
    Ok(ApiResponse::success(json!(products)).with_stats(json!(stats)))
}

async fn upload_all(state: &AppState, images: &[String]) -> Result<Vec<String>, ApiError> {
    let uploads = images.iter().map(|image| state.uploader.upload(image));
    Ok(try_join_all(uploads).await?)
}
