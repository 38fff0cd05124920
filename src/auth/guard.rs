//! Authentication guard and authorization checks.
//!
//! The guard verifies the bearer credential, resolves it against the user
//! store, and produces a request-scoped `Principal`. It is exposed as an
//! extractor so the dependency shows up in each handler's signature instead
//! of being smuggled through mutable request state. The guard has no side
//! effects: it never refreshes tokens or touches last-seen timestamps.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::{self, Claims};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::{Role, UserStatus};

/// Authenticated identity for one request. Built once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub role: Role,
    pub status: UserStatus,
}

impl Principal {
    /// Role gate for seller-only surfaces. There is no admin bypass; the
    /// checks are strict by design.
    pub fn require_seller(&self) -> Result<(), ApiError> {
        if self.role == Role::Seller {
            Ok(())
        } else {
            Err(ApiError::authorization("Seller account required"))
        }
    }

    /// Ownership gate for mutations. Callers confirm existence first, so a
    /// missing resource reports NotFound and never Authorization.
    pub fn require_owner(&self, owner: Uuid, action: &str) -> Result<(), ApiError> {
        if self.id == owner {
            Ok(())
        } else {
            Err(ApiError::authorization(format!("Not authorized to {action} this product")))
        }
    }
}

pub fn extract_bearer(headers: &HeaderMap) -> Result<String, ApiError> {
    let header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| ApiError::authentication("Missing Authorization header"))?;

    let value = header
        .to_str()
        .map_err(|_| ApiError::authentication("Invalid Authorization header format"))?;

    let Some(token) = value.strip_prefix("Bearer ") else {
        return Err(ApiError::authentication(
            "Authorization header must use Bearer token format",
        ));
    };
    if token.trim().is_empty() {
        return Err(ApiError::authentication("Empty bearer token"));
    }
    Ok(token.to_string())
}

/// Verify the bearer credential and resolve it against the user store.
/// Rejects missing/invalid/expired tokens, vanished accounts, and accounts
/// whose status is not active.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Principal, ApiError> {
    let token = extract_bearer(headers)?;
    let claims: Claims = auth::verify_token(&token)?;

    let user = state
        .users
        .user_by_id(claims.sub)
        .await?
        .ok_or_else(|| ApiError::authentication("Account no longer exists"))?;

    if user.status != UserStatus::Active {
        tracing::warn!(user = %user.id, status = ?user.status, "rejected credential for non-active account");
        return Err(ApiError::authentication("Account is not active. Please contact support."));
    }

    Ok(Principal { id: user.id, role: user.role, status: user.status })
}

#[async_trait]
impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(state, &parts.headers).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;
    use axum::http::StatusCode;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn missing_header_is_authentication() {
        let err = extract_bearer(&HeaderMap::new()).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Missing Authorization header");
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let err = extract_bearer(&headers("Basic dXNlcjpwYXNz")).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = extract_bearer(&headers("Bearer   ")).unwrap_err();
        assert_eq!(err.message(), "Empty bearer token");
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn ownership_check_compares_identifiers() {
        let principal = Principal {
            id: Uuid::new_v4(),
            role: Role::Seller,
            status: UserStatus::Active,
        };
        assert!(principal.require_owner(principal.id, "update").is_ok());
        let err = principal.require_owner(Uuid::new_v4(), "delete").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "Not authorized to delete this product");
    }

    #[test]
    fn seller_gate_has_no_admin_bypass() {
        for role in [Role::User, Role::Admin, Role::Customer] {
            let principal = Principal { id: Uuid::new_v4(), role, status: UserStatus::Active };
            assert!(principal.require_seller().is_err(), "{role:?}");
        }
    }
}
