//! Request validation pipeline.
//!
//! Every endpoint has an explicit validation function (`user`, `product`)
//! built from the field helpers in this module. Validators check the whole
//! payload in one pass and report every violation together, so a client can
//! render all problems at once. Unknown fields are stripped by construction:
//! the typed payload a validator returns carries only the declared fields.

use serde::Serialize;
use serde_json::{Map, Value};

pub mod product;
pub mod user;

/// A single field-level validation failure. Field paths use dot notation
/// (`images.2` for array elements).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, Vec<Violation>>;

/// Collector that keeps validation running past the first failure.
#[derive(Debug, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(Violation::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0
    }
}

/// Trim every top-level string field of a body or query payload in place.
/// Non-string values are left untouched. This step cannot fail.
pub fn sanitize(payload: &mut Value) {
    if let Value::Object(map) = payload {
        for value in map.values_mut() {
            if let Value::String(s) = value {
                let trimmed = s.trim();
                if trimmed.len() != s.len() {
                    *value = Value::String(trimmed.to_string());
                }
            }
        }
    }
}

/// Payloads must be JSON objects; anything else is a single body-level
/// violation and no field checks run.
pub(crate) fn as_object(payload: &Value) -> Result<&Map<String, Value>, Vec<Violation>> {
    payload
        .as_object()
        .ok_or_else(|| vec![Violation::new("body", "payload must be a JSON object")])
}

pub(crate) fn require_string(
    map: &Map<String, Value>,
    field: &str,
    min: usize,
    max: usize,
    errors: &mut Violations,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, format!("{field} is required"));
            None
        }
        Some(value) => coerce_string(value, field, min, max, errors),
    }
}

pub(crate) fn optional_string(
    map: &Map<String, Value>,
    field: &str,
    min: usize,
    max: usize,
    errors: &mut Violations,
) -> Option<String> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => coerce_string(value, field, min, max, errors),
    }
}

fn coerce_string(
    value: &Value,
    field: &str,
    min: usize,
    max: usize,
    errors: &mut Violations,
) -> Option<String> {
    let Value::String(raw) = value else {
        errors.add(field, format!("{field} must be a string"));
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{field} is not allowed to be empty"));
        return None;
    }
    let length = trimmed.chars().count();
    if length < min {
        errors.add(field, format!("{field} must be at least {min} characters"));
        return None;
    }
    if length > max {
        errors.add(field, format!("{field} must be at most {max} characters"));
        return None;
    }
    Some(trimmed.to_string())
}

pub(crate) fn require_email(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Violations,
) -> Option<String> {
    let raw = require_string(map, field, 1, 254, errors)?;
    let email = raw.to_lowercase();
    if !is_valid_email(&email) {
        errors.add(field, format!("{field} must be a valid email address"));
        return None;
    }
    Some(email)
}

fn is_valid_email(candidate: &str) -> bool {
    if candidate.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || !domain.contains('.') {
        return false;
    }
    domain
        .rsplit('.')
        .next()
        .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Integers accept JSON numbers or numeric strings and are coerced.
pub(crate) fn require_integer(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Violations,
) -> Option<i64> {
    match map.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, format!("{field} is required"));
            None
        }
        Some(value) => coerce_integer(value, field, errors),
    }
}

pub(crate) fn optional_integer(
    map: &Map<String, Value>,
    field: &str,
    errors: &mut Violations,
) -> Option<i64> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => coerce_integer(value, field, errors),
    }
}

fn coerce_integer(value: &Value, field: &str, errors: &mut Violations) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.add(field, format!("{field} must be an integer"));
    }
    parsed
}

/// Decimals accept JSON numbers or numeric strings. Number values go through
/// their shortest decimal representation, so `9.99` stays `9.99`.
pub(crate) fn coerce_decimal(
    value: &Value,
    field: &str,
    errors: &mut Violations,
) -> Option<rust_decimal::Decimal> {
    let parsed = match value {
        Value::Number(n) => n.to_string().parse().ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    if parsed.is_none() {
        errors.add(field, format!("{field} must be a number"));
    }
    parsed
}

pub(crate) fn require_string_array(
    map: &Map<String, Value>,
    field: &str,
    min_items: usize,
    max_items: usize,
    errors: &mut Violations,
) -> Option<Vec<String>> {
    match map.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, format!("{field} is required"));
            None
        }
        Some(value) => coerce_string_array(value, field, min_items, max_items, errors),
    }
}

pub(crate) fn optional_string_array(
    map: &Map<String, Value>,
    field: &str,
    min_items: usize,
    max_items: usize,
    errors: &mut Violations,
) -> Option<Vec<String>> {
    match map.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => coerce_string_array(value, field, min_items, max_items, errors),
    }
}

fn coerce_string_array(
    value: &Value,
    field: &str,
    min_items: usize,
    max_items: usize,
    errors: &mut Violations,
) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        errors.add(field, format!("{field} must be an array"));
        return None;
    };
    let mut clean = true;
    if items.len() < min_items {
        errors.add(field, format!("{field} must contain at least {min_items} item(s)"));
        clean = false;
    }
    if items.len() > max_items {
        errors.add(field, format!("{field} must contain at most {max_items} item(s)"));
        clean = false;
    }
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(s) if !s.trim().is_empty() => out.push(s.trim().to_string()),
            _ => {
                errors.add(&format!("{field}.{index}"), "must be a non-empty string");
                clean = false;
            }
        }
    }
    clean.then_some(out)
}
