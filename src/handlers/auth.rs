//! Account registration, login and identity endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::format::{ApiResponse, ApiResult};
use crate::auth::guard::Principal;
use crate::auth::{self, password, Claims};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::models::{NewUser, UserStatus};
use crate::validation::{self, user as schemas};

/// POST /api/auth/register - create an account and issue a token.
/// Duplicate emails surface from the store as a Conflict.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(mut payload) = payload?;
    validation::sanitize(&mut payload);
    let form = schemas::register(&payload).map_err(ApiError::validation)?;

    let password_hash = password::hash(&form.password)?;
    let user = state
        .users
        .create_user(NewUser {
            name: form.name,
            email: form.email,
            password_hash,
            role: form.role,
        })
        .await?;
    let token = auth::issue_token(&Claims::new(user.id, user.role))?;

    tracing::info!(user = %user.id, role = ?user.role, "registered new account");
    Ok(ApiResponse::created(json!({ "user": user, "token": token })))
}

/// POST /api/auth/login - verify credentials and issue a token. The only
/// path that reads the stored password hash, and the only one that records
/// a last-login timestamp.
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Value> {
    let Json(mut payload) = payload?;
    validation::sanitize(&mut payload);
    let form = schemas::login(&payload).map_err(ApiError::validation)?;

    let Some((user, stored_hash)) = state.users.credential_by_email(&form.email).await? else {
        return Err(ApiError::authentication("Invalid email or password"));
    };
    if user.status != UserStatus::Active {
        return Err(ApiError::authentication("Account is not active. Please contact support."));
    }
    if !password::verify(&form.password, &stored_hash)? {
        tracing::warn!(user = %user.id, "login rejected: bad password");
        return Err(ApiError::authentication("Invalid email or password"));
    }

    state.users.record_login(user.id, Utc::now()).await?;
    let token = auth::issue_token(&Claims::new(user.id, user.role))?;

    Ok(ApiResponse::success(json!({ "user": user, "token": token })))
}

/// GET /api/auth/me - the principal's public fields.
pub async fn me(State(state): State<AppState>, principal: Principal) -> ApiResult<Value> {
    let user = state
        .users
        .user_by_id(principal.id)
        .await?
        .ok_or_else(|| ApiError::authentication("Account no longer exists"))?;
    Ok(ApiResponse::success(json!({ "user": user })))
}
