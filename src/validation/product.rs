//! Product payload and listing-query schemas.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::config;
use crate::store::models::{ProductQuery, ProductStatus, SortOrder};

use super::{
    as_object, coerce_decimal, optional_integer, optional_string, optional_string_array,
    require_integer, require_string, require_string_array, ValidationResult, Violations,
};

const MAX_PRICE_UNITS: i64 = 999_999;

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: i64,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub images: Option<Vec<String>>,
    pub status: Option<ProductStatus>,
}

pub fn create(payload: &Value) -> ValidationResult<CreateProduct> {
    let map = as_object(payload)?;
    let mut errors = Violations::new();

    let name = require_string(map, "name", 2, 100, &mut errors);
    let description = require_string(map, "description", 10, 1000, &mut errors);
    let price = require_price(map, &mut errors);
    let category = require_string(map, "category", 2, 50, &mut errors);
    let stock = require_stock(map, &mut errors);
    let images = require_string_array(map, "images", 1, 10, &mut errors);

    match (name, description, price, category, stock, images) {
        (Some(name), Some(description), Some(price), Some(category), Some(stock), Some(images))
            if errors.is_empty() =>
        {
            Ok(CreateProduct { name, description, price, category, stock, images })
        }
        _ => Err(errors.into_vec()),
    }
}

/// Partial update: every field optional, same bounds as create. `status`
/// accepts only the seller-chosen values; out_of_stock is stock-driven.
pub fn update(payload: &Value) -> ValidationResult<UpdateProduct> {
    let map = as_object(payload)?;
    let mut errors = Violations::new();

    let form = UpdateProduct {
        name: optional_string(map, "name", 2, 100, &mut errors),
        description: optional_string(map, "description", 10, 1000, &mut errors),
        price: optional_price(map, &mut errors),
        category: optional_string(map, "category", 2, 50, &mut errors),
        stock: optional_stock(map, &mut errors),
        images: optional_string_array(map, "images", 1, 10, &mut errors),
        status: status_field(map, &mut errors),
    };

    if errors.is_empty() {
        Ok(form)
    } else {
        Err(errors.into_vec())
    }
}

/// Listing query: page/limit with defaults, category and price-range filters,
/// text search, sort order. Values arrive as query-string text and are
/// coerced like any other numeric field.
pub fn list_query(payload: &Value) -> ValidationResult<ProductQuery> {
    let map = as_object(payload)?;
    let mut errors = Violations::new();
    let pagination = &config::config().pagination;

    let page = match optional_integer(map, "page", &mut errors) {
        Some(page) if page >= 1 => Some(page as u64),
        Some(_) => {
            errors.add("page", "page must be at least 1");
            None
        }
        None => Some(1),
    };
    let limit = match optional_integer(map, "limit", &mut errors) {
        Some(limit) if limit >= 1 && limit as u64 <= pagination.max_limit => Some(limit as u64),
        Some(_) => {
            errors.add("limit", format!("limit must be between 1 and {}", pagination.max_limit));
            None
        }
        None => Some(pagination.default_limit),
    };

    let category = optional_string(map, "category", 1, 50, &mut errors);
    let min_price = optional_query_price(map, "min_price", &mut errors);
    let max_price = optional_query_price(map, "max_price", &mut errors);
    let search = optional_string(map, "q", 1, 200, &mut errors);

    let sort = match map.get("sort").and_then(Value::as_str).map(str::trim) {
        None | Some("") | Some("newest") => Some(SortOrder::Newest),
        Some("price_asc") => Some(SortOrder::PriceAsc),
        Some("price_desc") => Some(SortOrder::PriceDesc),
        Some(_) => {
            errors.add("sort", "sort must be one of newest, price_asc, price_desc");
            None
        }
    };

    match (page, limit, sort) {
        (Some(page), Some(limit), Some(sort)) if errors.is_empty() => Ok(ProductQuery {
            page,
            limit,
            category,
            min_price,
            max_price,
            search,
            sort,
            status: None,
        }),
        _ => Err(errors.into_vec()),
    }
}

fn require_price(map: &Map<String, Value>, errors: &mut Violations) -> Option<Decimal> {
    match map.get("price") {
        None | Some(Value::Null) => {
            errors.add("price", "price is required");
            None
        }
        Some(value) => price_bounds(coerce_decimal(value, "price", errors)?, errors),
    }
}

fn optional_price(map: &Map<String, Value>, errors: &mut Violations) -> Option<Decimal> {
    match map.get("price") {
        None | Some(Value::Null) => None,
        Some(value) => price_bounds(coerce_decimal(value, "price", errors)?, errors),
    }
}

/// Prices are positive, capped, and rounded to two decimal places.
fn price_bounds(price: Decimal, errors: &mut Violations) -> Option<Decimal> {
    if price <= Decimal::ZERO {
        errors.add("price", "price must be greater than 0");
        return None;
    }
    if price > Decimal::from(MAX_PRICE_UNITS) {
        errors.add("price", "price must not exceed 999999");
        return None;
    }
    Some(price.round_dp(2))
}

fn require_stock(map: &Map<String, Value>, errors: &mut Violations) -> Option<i64> {
    let stock = require_integer(map, "stock", errors)?;
    stock_bounds(stock, errors)
}

fn optional_stock(map: &Map<String, Value>, errors: &mut Violations) -> Option<i64> {
    let stock = optional_integer(map, "stock", errors)?;
    stock_bounds(stock, errors)
}

fn stock_bounds(stock: i64, errors: &mut Violations) -> Option<i64> {
    if stock < 0 {
        errors.add("stock", "stock cannot be negative");
        return None;
    }
    Some(stock)
}

fn status_field(map: &Map<String, Value>, errors: &mut Violations) -> Option<ProductStatus> {
    match map.get("status") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => match s.trim() {
            "active" => Some(ProductStatus::Active),
            "inactive" => Some(ProductStatus::Inactive),
            _ => {
                errors.add("status", "status must be one of active, inactive");
                None
            }
        },
        Some(_) => {
            errors.add("status", "status must be one of active, inactive");
            None
        }
    }
}

fn optional_query_price(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Violations,
) -> Option<Decimal> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let price = coerce_decimal(value, field, errors)?;
            if price < Decimal::ZERO {
                errors.add(field, format!("{field} cannot be negative"));
                return None;
            }
            Some(price)
        }
    }
}
