//! Reference in-memory backend for the store seam.
//!
//! Documents live in maps guarded by `tokio::sync::RwLock`; every operation
//! is independently atomic at the document level, matching the guarantees the
//! external store provides. Model-level constraints are enforced here the way
//! a schema-bearing document store would, so the `FieldValidation` signal is
//! real even behind the API validators.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::validation::Violation;

use super::models::{
    NewProduct, NewUser, Product, ProductPatch, ProductQuery, ProductStatus, SellerStats,
    SortOrder, User, UserStatus,
};
use super::{Page, ProductStore, StoreError, UserStore};

#[derive(Debug)]
struct UserRecord {
    user: User,
    password_hash: String,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
    products: RwLock<HashMap<Uuid, Product>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moderation hook: flip an account's status. Used by operational tooling
    /// and the test suite; not exposed through the HTTP surface.
    pub async fn set_user_status(&self, id: Uuid, status: UserStatus) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound { resource: "User".into() })?;
        record.user.status = status;
        record.user.updated_at = Utc::now();
        Ok(())
    }
}

/// Model constraints mirrored from the document schema.
fn check_product_fields(price: Decimal, stock: i64, images: &[String]) -> Result<(), StoreError> {
    let mut violations = Vec::new();
    if price < Decimal::ZERO {
        violations.push(Violation::new("price", "Price cannot be negative"));
    }
    if stock < 0 {
        violations.push(Violation::new("stock", "Stock cannot be negative"));
    }
    if images.is_empty() {
        violations.push(Violation::new("images", "Images array cannot be empty"));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(StoreError::FieldValidation(violations))
    }
}

fn matches_query(product: &Product, query: &ProductQuery) -> bool {
    if let Some(status) = query.status {
        if product.status != status {
            return false;
        }
    }
    if let Some(category) = &query.category {
        if !product.category.eq_ignore_ascii_case(category) {
            return false;
        }
    }
    if let Some(min) = query.min_price {
        if product.price < min {
            return false;
        }
    }
    if let Some(max) = query.max_price {
        if product.price > max {
            return false;
        }
    }
    if let Some(term) = &query.search {
        let term = term.to_lowercase();
        if !product.name.to_lowercase().contains(&term)
            && !product.description.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        let email = new.email.to_lowercase();
        if users.values().any(|record| record.user.email == email) {
            return Err(StoreError::DuplicateKey { field: "email".into() });
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: new.name,
            email,
            role: new.role,
            status: UserStatus::Active,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, UserRecord { user: user.clone(), password_hash: new.password_hash });
        Ok(user)
    }

    async fn user_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).map(|record| record.user.clone()))
    }

    async fn credential_by_email(
        &self,
        email: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|record| record.user.email == email)
            .map(|record| (record.user.clone(), record.password_hash.clone())))
    }

    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound { resource: "User".into() })?;
        record.user.last_login = Some(at);
        record.user.updated_at = at;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn create_product(&self, new: NewProduct) -> Result<Product, StoreError> {
        check_product_fields(new.price, new.stock, &new.images)?;
        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            price: new.price,
            category: new.category,
            stock: new.stock,
            images: new.images,
            seller: new.seller,
            status: ProductStatus::for_stock(new.stock, new.status),
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.insert(product.id, product.clone());
        Ok(product)
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(&self, query: &ProductQuery) -> Result<Page<Product>, StoreError> {
        let products = self.products.read().await;
        let mut matches: Vec<&Product> =
            products.values().filter(|p| matches_query(p, query)).collect();

        match query.sort {
            SortOrder::Newest => matches.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id))
            }),
            SortOrder::PriceAsc => matches.sort_by(|a, b| {
                a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id))
            }),
            SortOrder::PriceDesc => matches.sort_by(|a, b| {
                b.price.cmp(&a.price).then_with(|| a.id.cmp(&b.id))
            }),
        }

        let total = matches.len() as u64;
        let offset = query.page.saturating_sub(1).saturating_mul(query.limit) as usize;
        let items = matches
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(Page { items, total })
    }

    async fn products_by_seller(&self, seller: Uuid) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().await;
        let mut own: Vec<Product> =
            products.values().filter(|p| p.seller == seller).cloned().collect();
        own.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(own)
    }

    async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, StoreError> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound { resource: "Product".into() })?;

        let mut next = product.clone();
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(category) = patch.category {
            next.category = category;
        }
        if let Some(stock) = patch.stock {
            next.stock = stock;
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(images) = patch.images {
            next.images = images;
        }

        check_product_fields(next.price, next.stock, &next.images)?;
        next.status = ProductStatus::for_stock(next.stock, next.status);
        next.updated_at = Utc::now();

        *product = next.clone();
        Ok(next)
    }

    async fn delete_product(&self, id: Uuid) -> Result<(), StoreError> {
        self.products
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound { resource: "Product".into() })
    }

    async fn seller_stats(&self, seller: Uuid) -> Result<SellerStats, StoreError> {
        let products = self.products.read().await;
        let mut stats = SellerStats {
            total_products: 0,
            active: 0,
            inactive: 0,
            out_of_stock: 0,
            total_stock: 0,
        };
        for product in products.values().filter(|p| p.seller == seller) {
            stats.total_products += 1;
            stats.total_stock += product.stock;
            match product.status {
                ProductStatus::Active => stats.active += 1,
                ProductStatus::Inactive => stats.inactive += 1,
                ProductStatus::OutOfStock => stats.out_of_stock += 1,
            }
        }
        Ok(stats)
    }
}
