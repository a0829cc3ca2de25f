//! Configuration management for Tally API.
//!
//! Configuration is loaded in layers: defaults, then an optional
//! `config/tally` file, then `TALLY__`-prefixed environment variables, then
//! a handful of well-known direct variables (`JWT_SECRET`, `TALLY_DB_PATH`).
//! [`AppConfig::load`] validates the result; use
//! [`AppConfig::load_unchecked`] to handle validation separately.

pub mod error;

pub use error::{ConfigResult, ConfigurationError};

use serde::{Deserialize, Serialize};

/// Minimum acceptable JWT secret length.
const MIN_JWT_SECRET_LEN: usize = 16;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from environment and config files, validated.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::load_unchecked()?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {e}"))?;

        Ok(config)
    }

    /// Load configuration without validation.
    pub fn load_unchecked() -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.timeout_secs", 30)?
            .set_default("auth.token_expiry_days", 7)?
            .set_default("database.path", "./data/tally.sqlite")?
            .add_source(config::File::with_name("config/tally").required(false))
            .add_source(
                config::Environment::with_prefix("TALLY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: AppConfig = config.try_deserialize().unwrap_or_default();

        // Secrets come from direct environment variables
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            app_config.auth.jwt_secret = Some(secret);
        }
        if let Ok(path) = std::env::var("TALLY_DB_PATH") {
            app_config.database.path = path;
        }

        Ok(app_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigurationError::InvalidPort);
        }
        if let Some(secret) = &self.auth.jwt_secret {
            if secret.len() < MIN_JWT_SECRET_LEN {
                return Err(ConfigurationError::WeakJwtSecret {
                    minimum: MIN_JWT_SECRET_LEN,
                    actual: secret.len(),
                });
            }
        }
        if self.auth.token_expiry_days <= 0 {
            return Err(ConfigurationError::InvalidTokenExpiry(
                self.auth.token_expiry_days,
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigurationError::EmptyDatabasePath);
        }
        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Main API port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT signing secret. Required for any authenticated endpoint.
    pub jwt_secret: Option<String>,
    /// Token validity in days.
    #[serde(default = "default_token_expiry_days")]
    pub token_expiry_days: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiry_days: default_token_expiry_days(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout() -> u64 {
    30
}

fn default_token_expiry_days() -> i64 {
    7
}

fn default_db_path() -> String {
    "./data/tally.sqlite".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.auth.token_expiry_days, 7);
    }

    #[test]
    fn weak_jwt_secret_rejected() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("short".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::WeakJwtSecret { .. })
        ));

        config.auth.jwt_secret = Some("long-enough-secret-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn non_positive_expiry_rejected() {
        let mut config = AppConfig::default();
        config.auth.token_expiry_days = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidTokenExpiry(0))
        ));
    }
}
