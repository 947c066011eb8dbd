//! Gotenberg HTML to PDF renderer.
//!
//! Posts the document to `/forms/chromium/convert/html` as `index.html`
//! with A4 paper dimensions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::ports::{DocumentRenderer, RenderError};

const A4_WIDTH_INCHES: &str = "8.27";
const A4_HEIGHT_INCHES: &str = "11.7";

#[derive(Debug, Clone)]
pub struct GotenbergConfig {
    base_url: String,
    timeout: Duration,
}

impl GotenbergConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

pub struct GotenbergPdfRenderer {
    config: GotenbergConfig,
    http_client: reqwest::Client,
}

impl GotenbergPdfRenderer {
    pub fn new(config: GotenbergConfig) -> Result<Self, RenderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RenderError::ServiceUnavailable(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn convert_url(&self) -> String {
        format!("{}/forms/chromium/convert/html", self.config.base_url)
    }
}

#[async_trait]
impl DocumentRenderer for GotenbergPdfRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let page = Part::bytes(html.as_bytes().to_vec())
            .file_name("index.html")
            .mime_str("text/html")
            .map_err(|e| RenderError::ConversionFailed(e.to_string()))?;
        let form = Form::new()
            .part("files", page)
            .text("paperWidth", A4_WIDTH_INCHES)
            .text("paperHeight", A4_HEIGHT_INCHES)
            .text("printBackground", "true");

        let response = self
            .http_client
            .post(self.convert_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout(self.config.timeout.as_secs())
                } else {
                    RenderError::ServiceUnavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, "Gotenberg conversion failed");
            return Err(RenderError::ConversionFailed(format!("status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RenderError::ConversionFailed(e.to_string()))?;
        if bytes.is_empty() {
            return Err(RenderError::EmptyOutput);
        }
        Ok(bytes.to_vec())
    }
}
