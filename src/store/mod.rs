//! Document-store collaborator seam.
//!
//! The persistence engine itself is external; controllers consume these
//! traits through handles constructed at startup and passed down explicitly.
//! Backends must keep the failure signals distinguishable so the error
//! normalizer can classify them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::validation::Violation;

pub mod memory;
pub mod models;

use models::{NewProduct, NewUser, Product, ProductPatch, ProductQuery, SellerStats, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate value for unique field '{field}'")]
    DuplicateKey { field: String },

    #[error("malformed identifier '{0}'")]
    InvalidId(String),

    #[error("field validation failed")]
    FieldValidation(Vec<Violation>),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Parse a raw path identifier. Malformed ids surface as `InvalidId`, which
/// the normalizer reports as a missing resource rather than a format error.
pub fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim()).map_err(|_| StoreError::InvalidId(raw.to_string()))
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Credential lookup for login: the only read path that exposes the
    /// stored password hash.
    async fn credential_by_email(&self, email: &str)
        -> Result<Option<(User, String)>, StoreError>;

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> Result<Product, StoreError>;

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, StoreError>;

    async fn products_by_seller(&self, seller: Uuid) -> Result<Vec<Product>, StoreError>;

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError>;

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError>;

    async fn seller_stats(&self, seller: Uuid) -> Result<SellerStats, StoreError>;
}

/// One page of results plus the unpaginated match count.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}
