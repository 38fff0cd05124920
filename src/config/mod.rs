use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
    pub uploads: UploadConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: u64,
    pub max_limit: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// External image-upload endpoint. Unset means the passthrough uploader.
    pub endpoint: Option<String>,
    pub folder: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment profile first, then specific env vars override.
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }
        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().unwrap_or(self.pagination.max_limit);
        }
        if let Ok(v) = env::var("UPLOADS_ENDPOINT") {
            self.uploads.endpoint = if v.is_empty() { None } else { Some(v) };
        }
        if let Ok(v) = env::var("UPLOADS_FOLDER") {
            self.uploads.folder = v;
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 4000 },
            security: SecurityConfig {
                jwt_secret: "insecure-dev-secret".to_string(),
                jwt_expiry_hours: 24 * 7,
                bcrypt_cost: 4,
            },
            pagination: PaginationConfig { default_limit: 10, max_limit: 100 },
            uploads: UploadConfig { endpoint: None, folder: "marketplace-dev".to_string() },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 4000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 10,
            },
            pagination: PaginationConfig { default_limit: 10, max_limit: 100 },
            uploads: UploadConfig { endpoint: None, folder: "marketplace-staging".to_string() },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 4000 },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                bcrypt_cost: 12,
            },
            pagination: PaginationConfig { default_limit: 10, max_limit: 100 },
            uploads: UploadConfig { endpoint: None, folder: "marketplace".to_string() },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Development
        )
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!(
            $crate::config::CONFIG.environment,
            $crate::config::Environment::Production
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_profile_is_permissive() {
        let config = AppConfig::development();
        assert!(!config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 4);
        assert_eq!(config.pagination.default_limit, 10);
    }

    #[test]
    fn production_profile_requires_an_explicit_secret() {
        let config = AppConfig::production();
        assert!(config.security.jwt_secret.is_empty());
        assert_eq!(config.security.bcrypt_cost, 12);
    }
}
