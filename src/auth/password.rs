//! Password hashing, delegated to bcrypt with a per-environment cost.

use crate::config;
use crate::error::ApiError;

pub fn hash(password: &str) -> Result<String, ApiError> {
    Ok(bcrypt::hash(password, config::config().security.bcrypt_cost)?)
}

pub fn verify(candidate: &str, stored_hash: &str) -> Result<bool, ApiError> {
    Ok(bcrypt::verify(candidate, stored_hash)?)
}
