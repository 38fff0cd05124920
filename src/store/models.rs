//! Domain records as they cross the store seam and the wire.
//!
//! Wire format is camelCase to match the public API contract.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Seller,
    Admin,
    Customer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Inactive,
    OutOfStock,
}

impl ProductStatus {
    /// Stock-driven status rule, applied on every write that touches stock:
    /// zero stock always reads out_of_stock, and a restock lifts out_of_stock
    /// back to active. A seller-chosen `inactive` survives stock writes.
    pub fn for_stock(stock: i64, current: ProductStatus) -> ProductStatus {
        if stock == 0 {
            ProductStatus::OutOfStock
        } else if current == ProductStatus::OutOfStock {
            ProductStatus::Active
        } else {
            current
        }
    }
}

/// Public user record. The password hash is deliberately not a field of this
/// type; login retrieves it through `UserStore::credential_by_email` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i64,
    pub images: Vec<String>,
    pub seller: Uuid,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i64,
    pub images: Vec<String>,
    pub seller: Uuid,
    pub status: ProductStatus,
}

/// Partial update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub images: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Newest,
    PriceAsc,
    PriceDesc,
}

#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub page: u64,
    pub limit: u64,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub status: Option<ProductStatus>,
}

/// Aggregates for the seller dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStats {
    pub total_products: u64,
    pub active: u64,
    pub inactive: u64,
    pub out_of_stock: u64,
    pub total_stock: i64,
}
