//! Account payload schemas.

use serde_json::Value;

use crate::store::models::Role;

use super::{as_object, require_email, require_string, ValidationResult, Violations};

#[derive(Debug, Clone)]
pub struct RegisterPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Registration schema: name 2..=50, valid email (stored lowercase),
/// password 6..=100, role limited to the storefront-facing values.
pub fn register(payload: &Value) -> ValidationResult<RegisterPayload> {
    let map = as_object(payload)?;
    let mut errors = Violations::new();

    let name = require_string(map, "name", 2, 50, &mut errors);
    let email = require_email(map, "email", &mut errors);
    let password = require_string(map, "password", 6, 100, &mut errors);
    let role = role_field(map, &mut errors);

    match (name, email, password, role) {
        (Some(name), Some(email), Some(password), Some(role)) if errors.is_empty() => {
            Ok(RegisterPayload { name, email, password, role })
        }
        _ => Err(errors.into_vec()),
    }
}

/// Login schema: valid email plus a non-empty password. No length bounds on
/// the password here; stored credentials predate any bound changes.
pub fn login(payload: &Value) -> ValidationResult<LoginPayload> {
    let map = as_object(payload)?;
    let mut errors = Violations::new();

    let email = require_email(map, "email", &mut errors);
    let password = require_string(map, "password", 1, 1024, &mut errors);

    match (email, password) {
        (Some(email), Some(password)) if errors.is_empty() => Ok(LoginPayload { email, password }),
        _ => Err(errors.into_vec()),
    }
}

/// Self-service registration may only create seller or customer accounts.
/// Absent role defaults to customer.
fn role_field(map: &serde_json::Map<String, Value>, errors: &mut Violations) -> Option<Role> {
    match map.get("role") {
        None | Some(Value::Null) => Some(Role::Customer),
        Some(Value::String(s)) => match s.trim() {
            "seller" => Some(Role::Seller),
            "customer" => Some(Role::Customer),
            _ => {
                errors.add("role", "role must be one of seller, customer");
                None
            }
        },
        Some(_) => {
            errors.add("role", "role must be one of seller, customer");
            None
        }
    }
}
