//! Resend email provider.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::ports::{EmailError, EmailSender, OutgoingEmail};

#[derive(Clone)]
pub struct ResendConfig {
    api_key: SecretString,
    from_email: String,
    from_name: Option<String>,
    api_base_url: String,
    timeout: Duration,
}

impl ResendConfig {
    pub fn new(api_key: SecretString, from_email: impl Into<String>) -> Self {
        Self {
            api_key,
            from_email: from_email.into(),
            from_name: None,
            api_base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn from_header(&self) -> String {
        match &self.from_name {
            Some(name) => format!("{} <{}>", name, self.from_email),
            None => self.from_email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ResendEmailBody<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Sends mail through the Resend REST API.
pub struct ResendEmailSender {
    config: ResendConfig,
    http_client: reqwest::Client,
}

impl ResendEmailSender {
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        if config.from_email.trim().is_empty() {
            return Err(EmailError::InvalidConfig("from_email is empty".to_string()));
        }
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmailError::InvalidConfig(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn body<'a>(&self, email: &'a OutgoingEmail) -> ResendEmailBody<'a> {
        ResendEmailBody {
            from: self.config.from_header(),
            to: vec![email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            text: &email.text,
        }
    }
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let response = self
            .http_client
            .post(format!("{}/emails", self.config.api_base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&self.body(email))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmailError::Timeout
                } else {
                    EmailError::SendFailed(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(status, error = %error_text, "Resend rejected email");
            return Err(EmailError::SendFailed(format!("status {}: {}", status, error_text)));
        }

        tracing::debug!(subject = %email.subject, "Email accepted by Resend");
        Ok(())
    }
}
