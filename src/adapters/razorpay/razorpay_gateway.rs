//! Razorpay Orders API client.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

/// Razorpay API configuration.
#[derive(Clone)]
pub struct RazorpayConfig {
    key_id: String,
    key_secret: SecretString,
    api_base_url: String,
    timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: SecretString) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret,
            api_base_url: "https://api.razorpay.com".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error body returned by Razorpay on non-2xx responses.
#[derive(Debug, Deserialize)]
struct RazorpayErrorBody {
    error: RazorpayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct RazorpayErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Razorpay payment gateway adapter.
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http_client: reqwest::Client,
}

impl RazorpayGateway {
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Network(e.to_string()))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.api_base_url)
    }
}

fn order_body(request: &CreateOrderRequest) -> serde_json::Value {
    serde_json::json!({
        "amount": request.amount_minor,
        "currency": request.currency,
        "receipt": request.receipt,
    })
}

fn map_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Network(err.to_string())
    }
}

fn rejection_message(body: &str) -> String {
    match serde_json::from_str::<RazorpayErrorBody>(body) {
        Ok(parsed) => match (parsed.error.code, parsed.error.description) {
            (Some(code), Some(description)) => format!("{}: {}", code, description),
            (None, Some(description)) => description,
            (Some(code), None) => code,
            (None, None) => "no error detail".to_string(),
        },
        Err(_) => body.chars().take(200).collect(),
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .http_client
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.expose_secret()))
            .json(&order_body(&request))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::error!("Razorpay rejected API credentials");
            return Err(GatewayError::Authentication);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = rejection_message(&body);
            tracing::error!(status = status.as_u16(), error = %message, "Razorpay create_order failed");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: GatewayOrder = response.json().await.map_err(|e| {
            GatewayError::InvalidResponse(format!("Failed to parse Razorpay order: {}", e))
        })?;

        tracing::info!(order_id = %order.id, amount = order.amount, currency = %order.currency, "Razorpay order created");
        Ok(order)
    }
}
