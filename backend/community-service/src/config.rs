/// Configuration management for Community Service
///
/// Configuration is read from the environment exactly once at startup and the
/// resulting [`Config`] value is passed to everything that needs it.
use cursor_pagination::PageLimits;
use serde::{Deserialize, Serialize};
use std::fmt;

const DEV_JWT_SECRET: &str = "community-service-development-secret-change-me";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub cors: CorsConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
    pub notifications: NotificationConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.env.eq_ignore_ascii_case("production")
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Bearer token validation settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 key shared with the identity provider
    pub jwt_secret: String,
    /// Expected `iss` claim, if the identity provider sets one
    pub jwt_issuer: Option<String>,
    pub leeway_secs: u64,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

/// Listing page sizes
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl PaginationConfig {
    pub fn limits(&self) -> PageLimits {
        PageLimits::new(self.default_limit, self.max_limit)
    }
}

/// Notification dispatcher settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Events buffered between request handlers and the dispatcher worker
    pub queue_capacity: usize,
    /// Hand stored notifications to the push sender
    pub push_enabled: bool,
    pub shutdown_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

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

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if production && secret.len() < 32 => {
                return Err("JWT_SECRET must be at least 32 bytes in production".to_string())
            }
            Ok(secret) => secret,
            Err(_) if production => return Err("JWT_SECRET must be set in production".to_string()),
            Err(_) => {
                tracing::warn!("JWT_SECRET not set; using the development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let default_limit = parse_env_or_default("PAGINATION_DEFAULT_LIMIT", 25usize)?;
        let max_limit = parse_env_or_default("PAGINATION_MAX_LIMIT", 100usize)?;
        if default_limit == 0 || max_limit == 0 || default_limit > max_limit {
            return Err(format!(
                "Invalid pagination limits: default={} max={}",
                default_limit, max_limit
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("COMMUNITY_SERVICE_HOST")
                    .unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("COMMUNITY_SERVICE_PORT", 8085u16)?,
                workers: parse_env_or_default("COMMUNITY_SERVICE_WORKERS", 4usize)?,
            },
            cors: CorsConfig { allowed_origins },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/community".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10u32)?,
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_issuer: std::env::var("JWT_ISSUER")
                    .ok()
                    .filter(|v| !v.trim().is_empty()),
                leeway_secs: parse_env_or_default("JWT_LEEWAY_SECS", 30u64)?,
            },
            pagination: PaginationConfig {
                default_limit,
                max_limit,
            },
            notifications: NotificationConfig {
                queue_capacity: parse_env_or_default("NOTIFICATION_QUEUE_CAPACITY", 1024usize)?
                    .max(1),
                push_enabled: parse_env_or_default("NOTIFICATION_PUSH_ENABLED", true)?,
                shutdown_timeout_secs: parse_env_or_default(
                    "NOTIFICATION_SHUTDOWN_TIMEOUT_SECS",
                    10u64,
                )?,
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .trim()
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "CORS_ALLOWED_ORIGINS",
        "JWT_SECRET",
        "JWT_ISSUER",
        "PAGINATION_DEFAULT_LIMIT",
        "PAGINATION_MAX_LIMIT",
        "COMMUNITY_SERVICE_PORT",
        "NOTIFICATION_QUEUE_CAPACITY",
        "NOTIFICATION_PUSH_ENABLED",
    ];

    fn clear_env() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn development_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8085);
        assert_eq!(config.cors.allowed_origins, "http://localhost:3000");
        assert_eq!(config.auth.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.pagination.default_limit, 25);
        assert_eq!(config.pagination.max_limit, 100);
        assert_eq!(config.notifications.queue_capacity, 1024);
        assert!(config.notifications.push_enabled);
    }

    #[test]
    #[serial]
    fn production_requires_secret_and_origins() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().unwrap_err().contains("CORS_ALLOWED_ORIGINS"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "*");
        assert!(Config::from_env().unwrap_err().contains("cannot be '*'"));

        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://community.example");
        assert!(Config::from_env().unwrap_err().contains("JWT_SECRET"));

        std::env::set_var("JWT_SECRET", "short");
        assert!(Config::from_env().unwrap_err().contains("32 bytes"));

        std::env::set_var("JWT_SECRET", "a".repeat(48));
        assert!(Config::from_env().is_ok());
        clear_env();
    }

    #[test]
    #[serial]
    fn pagination_limits_are_validated() {
        clear_env();
        std::env::set_var("PAGINATION_DEFAULT_LIMIT", "50");
        std::env::set_var("PAGINATION_MAX_LIMIT", "20");
        assert!(Config::from_env().unwrap_err().contains("Invalid pagination limits"));

        std::env::set_var("PAGINATION_MAX_LIMIT", "many");
        assert!(Config::from_env().unwrap_err().contains("PAGINATION_MAX_LIMIT"));

        std::env::set_var("PAGINATION_DEFAULT_LIMIT", "10");
        std::env::set_var("PAGINATION_MAX_LIMIT", "40");
        let config = Config::from_env().unwrap();
        assert_eq!(config.pagination.limits(), PageLimits::new(10, 40));
        clear_env();
    }

    #[test]
    fn auth_config_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: "super-secret-value".to_string(),
            jwt_issuer: None,
            leeway_secs: 30,
        };
        assert!(!format!("{:?}", auth).contains("super-secret-value"));
    }
}
