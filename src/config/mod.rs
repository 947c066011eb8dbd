//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `NEXUS_BILLING`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use nexus_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod admin;
mod auth;
mod billing;
mod database;
mod email;
mod error;
mod payment;
mod renderer;
mod server;

pub use admin::AdminConfig;
pub use auth::AuthConfig;
pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use renderer::RendererConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, public URL)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Bearer token configuration
    pub auth: AuthConfig,

    /// Payment gateway and payment token configuration (Razorpay)
    pub payment: PaymentConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,

    /// Invoice PDF renderer
    #[serde(default)]
    pub renderer: RendererConfig,

    /// Entitlement policy and sweep threshold
    #[serde(default)]
    pub billing: BillingConfig,

    /// Operator endpoints
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `NEXUS_BILLING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `NEXUS_BILLING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `NEXUS_BILLING__PAYMENT__RAZORPAY_KEY_SECRET=...` -> `payment.razorpay_key_secret`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("NEXUS_BILLING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        self.email.validate()?;
        self.renderer.validate()?;
        self.billing.validate()?;
        self.admin.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::EntitlementPolicy;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const MINIMAL_ENV: &[(&str, &str)] = &[
        ("NEXUS_BILLING__DATABASE__URL", "postgresql://test@localhost/test"),
        ("NEXUS_BILLING__AUTH__JWT_SECRET", "0123456789abcdef0123456789abcdef"),
        ("NEXUS_BILLING__PAYMENT__RAZORPAY_KEY_ID", "rzp_test_abc"),
        ("NEXUS_BILLING__PAYMENT__RAZORPAY_KEY_SECRET", "rzp_secret"),
        (
            "NEXUS_BILLING__PAYMENT__TOKEN_ENCRYPTION_KEY",
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
        ),
        ("NEXUS_BILLING__EMAIL__RESEND_API_KEY", "re_xxx"),
    ];

    const OPTIONAL_ENV: &[&str] = &[
        "NEXUS_BILLING__SERVER__PORT",
        "NEXUS_BILLING__SERVER__ENVIRONMENT",
        "NEXUS_BILLING__BILLING__ENTITLEMENT_POLICY",
        "NEXUS_BILLING__ADMIN__API_KEY",
    ];

    fn set_minimal_env() {
        for (key, value) in MINIMAL_ENV {
            env::set_var(key, value);
        }
    }

    fn clear_env() {
        for (key, _) in MINIMAL_ENV {
            env::remove_var(key);
        }
        for key in OPTIONAL_ENV {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert_eq!(config.payment.razorpay_key_secret.expose_secret(), "rzp_secret");
        assert_eq!(config.payment.currency, "INR");
        assert!(!config.admin.is_enabled());
    }

    #[test]
    fn test_validate_full_config() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("NEXUS_BILLING__SERVER__PORT", "3000");
        env::set_var("NEXUS_BILLING__BILLING__ENTITLEMENT_POLICY", "successful_payment");
        env::set_var("NEXUS_BILLING__ADMIN__API_KEY", "admin-key-0123456789");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(
            config.billing.entitlement_policy,
            EntitlementPolicy::SuccessfulPayment
        );
        assert!(config.admin.is_enabled());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("NEXUS_BILLING__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_missing_required_section_fails() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
