//! Payment configuration

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Razorpay + payment token key)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Razorpay key id (`rzp_test_...` or `rzp_live_...`)
    pub razorpay_key_id: String,

    /// Razorpay key secret; also the HMAC key for checkout callbacks
    pub razorpay_key_secret: SecretString,

    /// Currency orders are placed in
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 32-byte payment token key, hex encoded
    pub token_encryption_key: SecretString,
}

impl PaymentConfig {
    /// Check if using Razorpay test mode
    pub fn is_test_mode(&self) -> bool {
        self.razorpay_key_id.starts_with("rzp_test_")
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.razorpay_key_id.is_empty() {
            return Err(ValidationError::MissingRequired("payment.razorpay_key_id"));
        }
        if self.razorpay_key_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("payment.razorpay_key_secret"));
        }
        if !self.razorpay_key_id.starts_with("rzp_") {
            return Err(ValidationError::InvalidRazorpayKeyId);
        }

        let key = self.token_encryption_key.expose_secret();
        if key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidTokenEncryptionKey);
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            razorpay_key_id: String::new(),
            razorpay_key_secret: SecretString::new(String::new()),
            currency: default_currency(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            token_encryption_key: SecretString::new(String::new()),
        }
    }
}

fn default_currency() -> String {
    "INR".to_string()
}

fn default_api_base_url() -> String {
    "https://api.razorpay.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> PaymentConfig {
        PaymentConfig {
            razorpay_key_id: "rzp_test_abc123".to_string(),
            razorpay_key_secret: SecretString::new("secret".to_string()),
            token_encryption_key: SecretString::new("ab".repeat(32)),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid();
        assert!(config.validate().is_ok());
        assert!(config.is_test_mode());
        assert_eq!(config.currency, "INR");
    }

    #[test]
    fn test_validation_missing_key_id() {
        let config = PaymentConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_key_id_prefix() {
        let config = PaymentConfig {
            razorpay_key_id: "pk_test_xxx".to_string(),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRazorpayKeyId)
        ));
    }

    #[test]
    fn test_validation_token_key_must_be_32_bytes_hex() {
        let config = PaymentConfig {
            token_encryption_key: SecretString::new("abcd".to_string()),
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTokenEncryptionKey)
        ));

        let config = PaymentConfig {
            token_encryption_key: SecretString::new("zz".repeat(32)),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_currency() {
        let config = PaymentConfig {
            currency: "rupees".to_string(),
            ..valid()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidCurrency)));
    }
}
