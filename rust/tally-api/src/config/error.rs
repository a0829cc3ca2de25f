//! Configuration error types.

use thiserror::Error;

/// Result alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Errors produced by configuration validation.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The bind port is zero.
    #[error("server.port must be non-zero")]
    InvalidPort,

    /// The JWT secret is too short to be safe.
    #[error("JWT secret must be at least {minimum} characters, got {actual}")]
    WeakJwtSecret { minimum: usize, actual: usize },

    /// Token expiry must be a positive number of days.
    #[error("auth.token_expiry_days must be positive, got {0}")]
    InvalidTokenExpiry(i64),

    /// The database path is empty.
    #[error("database.path must not be empty")]
    EmptyDatabasePath,
}
