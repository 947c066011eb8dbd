//! Email configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Email configuration (Resend)
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Resend API key
    pub resend_api_key: SecretString,

    /// From email address
    #[serde(default = "default_from_email")]
    pub from_email: String,

    /// From name
    #[serde(default = "default_from_name")]
    pub from_name: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EmailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate email configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.resend_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("email.resend_api_key"));
        }
        if !key.starts_with("re_") {
            return Err(ValidationError::InvalidResendKey);
        }
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            resend_api_key: SecretString::new(String::new()),
            from_email: default_from_email(),
            from_name: default_from_name(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_from_email() -> String {
    "billing@nexus.app".to_string()
}

fn default_from_name() -> String {
    "Nexus Billing".to_string()
}

fn default_api_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_timeout() -> u64 {
    10
}
