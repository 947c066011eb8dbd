//! Document renderer configuration

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// HTML to PDF conversion service (Gotenberg-compatible)
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl RendererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(ValidationError::InvalidUrl("renderer.url"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}
