//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("JWT secret must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("Invalid Razorpay key id format")]
    InvalidRazorpayKeyId,

    #[error("Token encryption key must be 64 hex characters")]
    InvalidTokenEncryptionKey,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("Invalid Resend API key format")]
    InvalidResendKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Stale pending threshold must be positive")]
    InvalidStaleThreshold,

    #[error("Admin API key must be at least 16 characters")]
    WeakAdminKey,

    #[error("{0} must use HTTPS in production")]
    MustBeHttps(&'static str),
}
