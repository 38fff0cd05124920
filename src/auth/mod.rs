//! Credential signing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::error::ApiError;
use crate::store::models::Role;

pub mod guard;
pub mod password;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        Self {
            sub: user_id,
            role,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn issue_token(claims: &Claims) -> Result<String, ApiError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(ApiError::internal("JWT secret not configured"));
    }
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| ApiError::internal(format!("token generation failed: {e}")))
}

/// Verify signature and expiry, then hand back the identity claim. Signature
/// and expiry failures normalize to `Authentication`.
pub fn verify_token(token: &str) -> Result<Claims, ApiError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(ApiError::internal("JWT secret not configured"));
    }
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = issue_token(&Claims::new(user_id, Role::Seller)).unwrap();
        let claims = verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Seller);
    }

    #[test]
    fn expired_token_reports_authentication() {
        let now = Utc::now().timestamp();
        // Well past the default decode leeway.
        let claims = Claims { sub: Uuid::new_v4(), role: Role::Customer, exp: now - 7200, iat: now - 10_000 };
        let token = issue_token(&claims).unwrap();
        let err = verify_token(&token).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Token expired");
    }

    #[test]
    fn garbage_token_reports_authentication() {
        let err = verify_token("not-a-token").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Invalid token");
    }
}
