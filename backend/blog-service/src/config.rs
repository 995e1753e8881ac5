/// Configuration management for Blog Service
///
/// This module handles loading configuration from environment variables.
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Which store backend serves requests
    pub store: StoreBackend,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Token validation configuration
    pub auth: AuthConfig,
    /// Orphan comment reconciler configuration
    pub reconciler: ReconcilerConfig,
    /// Number of comments returned by the "recent comments" listing
    pub recent_comments_limit: usize,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min connections in pool
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret used to validate bearer tokens
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Seconds between reconciliation cycles
    pub interval_secs: u64,
    /// Minimum age of an unreferenced comment before it is reclaimed
    pub grace_period_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        Ok(Config {
            app: AppConfig {
                env: app_env.clone(),
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BLOG_SERVICE_PORT", 4000)?,
            },
            cors: {
                let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
                    Ok(value) => value,
                    Err(_) if production => {
                        return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
                    }
                    Err(_) => "http://localhost:3000".to_string(),
                };

                if production && allowed_origins.trim() == "*" {
                    return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
                }

                CorsConfig { allowed_origins }
            },
            store: match std::env::var("BLOG_STORE") {
                Ok(value) if value.eq_ignore_ascii_case("memory") => StoreBackend::Memory,
                Ok(value) if value.eq_ignore_ascii_case("postgres") => StoreBackend::Postgres,
                Ok(value) => return Err(format!("Unknown BLOG_STORE '{}'", value)),
                Err(_) => StoreBackend::Postgres,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/blog".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
                min_connections: parse_env_or_default("DATABASE_MIN_CONNECTIONS", 1)?,
                acquire_timeout_secs: parse_env_or_default("DATABASE_ACQUIRE_TIMEOUT_SECS", 10)?,
            },
            auth: {
                let jwt_secret = match std::env::var("JWT_SECRET") {
                    Ok(value) if !value.trim().is_empty() => value,
                    _ if production => {
                        return Err("JWT_SECRET must be set in production".to_string())
                    }
                    _ => "dev-secret".to_string(),
                };

                AuthConfig { jwt_secret }
            },
            reconciler: ReconcilerConfig {
                interval_secs: parse_env_or_default("RECONCILER_INTERVAL_SECS", 3600)?,
                grace_period_secs: parse_env_or_default("RECONCILER_GRACE_PERIOD_SECS", 600)?,
            },
            recent_comments_limit: parse_env_or_default("RECENT_COMMENTS_LIMIT", 3)?,
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "APP_ENV",
            "BLOG_SERVICE_PORT",
            "CORS_ALLOWED_ORIGINS",
            "BLOG_STORE",
            "JWT_SECRET",
            "RECENT_COMMENTS_LIMIT",
            "RECONCILER_GRACE_PERIOD_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_in_development() {
        clear_env();
        let config = Config::from_env().expect("development config loads");
        assert_eq!(config.app.port, 4000);
        assert_eq!(config.store, StoreBackend::Postgres);
        assert_eq!(config.recent_comments_limit, 3);
        assert_eq!(config.reconciler.grace_period_secs, 600);
    }

    #[test]
    #[serial]
    fn production_requires_jwt_secret() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://blog.example.com");

        let err = Config::from_env().unwrap_err();
        assert!(err.contains("JWT_SECRET"));
        clear_env();
    }

    #[test]
    #[serial]
    fn rejects_unknown_store_backend() {
        clear_env();
        std::env::set_var("BLOG_STORE", "mongo");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn malformed_number_is_an_error() {
        clear_env();
        std::env::set_var("BLOG_SERVICE_PORT", "not-a-port");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("BLOG_SERVICE_PORT"));
        clear_env();
    }
}
