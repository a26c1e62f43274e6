use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Include internal error messages in responses. Off in production.
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

/// One rate-limit rule: at most `max_requests` per `window_secs` per client IP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub general: RateLimitRule,
    /// Authentication attempts. Only failed attempts are counted.
    pub auth: RateLimitRule,
    pub create: RateLimitRule,
    pub search: RateLimitRule,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Environment presets first, then specific env var overrides
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs =
                v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        if let Ok(v) = env::var("PAGINATION_DEFAULT_LIMIT") {
            self.pagination.default_limit = v.parse().unwrap_or(self.pagination.default_limit);
        }
        if let Ok(v) = env::var("PAGINATION_MAX_LIMIT") {
            self.pagination.max_limit = v.parse().unwrap_or(self.pagination.max_limit);
        }

        if let Ok(v) = env::var("RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = v.parse().unwrap_or(self.rate_limit.enabled);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: "dev_secret_change_me_in_production".to_string(),
                jwt_expiry_hours: 24,
                expose_error_details: true,
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 1000,
            },
            rate_limit: RateLimitConfig {
                enabled: false,
                general: RateLimitRule { max_requests: 100, window_secs: 900 },
                auth: RateLimitRule { max_requests: 5, window_secs: 900 },
                create: RateLimitRule { max_requests: 20, window_secs: 3600 },
                search: RateLimitRule { max_requests: 50, window_secs: 600 },
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            database: DatabaseConfig {
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                expose_error_details: true,
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 500,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                general: RateLimitRule { max_requests: 100, window_secs: 900 },
                auth: RateLimitRule { max_requests: 5, window_secs: 900 },
                create: RateLimitRule { max_requests: 20, window_secs: 3600 },
                search: RateLimitRule { max_requests: 50, window_secs: 600 },
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                max_connections: 50,
                acquire_timeout_secs: 5,
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET; an empty secret rejects all tokens.
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                expose_error_details: false,
            },
            pagination: PaginationConfig {
                default_limit: 10,
                max_limit: 100,
            },
            rate_limit: RateLimitConfig {
                enabled: true,
                general: RateLimitRule { max_requests: 100, window_secs: 900 },
                auth: RateLimitRule { max_requests: 5, window_secs: 900 },
                create: RateLimitRule { max_requests: 20, window_secs: 3600 },
                search: RateLimitRule { max_requests: 50, window_secs: 600 },
            },
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_defaults() {
        let config = AppConfig::development();
        assert!(!config.rate_limit.enabled);
        assert_eq!(config.pagination.default_limit, 10);
        assert!(config.security.expose_error_details);
        assert!(!config.security.jwt_secret.is_empty());
    }

    #[test]
    fn production_defaults() {
        let config = AppConfig::production();
        assert!(config.rate_limit.enabled);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(!config.security.expose_error_details);
        assert!(config.security.jwt_secret.is_empty());
    }
}
