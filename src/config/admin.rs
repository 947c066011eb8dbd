//! Operator endpoint configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Admin routes are mounted only when `api_key` is set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminConfig {
    pub api_key: Option<SecretString>,
}

impl AdminConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.api_key {
            Some(key) if key.expose_secret().len() < 16 => Err(ValidationError::WeakAdminKey),
            _ => Ok(()),
        }
    }
}
