//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Bearer token configuration (HS256 JWTs)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared HS256 signing secret
    pub jwt_secret: SecretString,

    /// Allowed clock skew when checking `exp`, in seconds
    #[serde(default = "default_leeway")]
    pub leeway_secs: u64,
}

impl AuthConfig {
    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("auth.jwt_secret"));
        }
        if secret.len() < 32 {
            return Err(ValidationError::WeakJwtSecret);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: SecretString::new(String::new()),
            leeway_secs: default_leeway(),
        }
    }
}

fn default_leeway() -> u64 {
    30
}
