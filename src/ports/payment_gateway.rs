//! Payment gateway port.
//!
//! The gateway issues order handles that the client then pays against in
//! the gateway's own checkout. Implementations must bound every call with
//! a timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order for the given amount.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError>;
}

/// Request to create a gateway order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateOrderRequest {
    /// Amount in minor currency units.
    pub amount_minor: i64,
    /// ISO 4217 code.
    pub currency: String,
    /// Merchant receipt reference.
    pub receipt: String,
}

/// Order handle issued by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor currency units, as the gateway recorded it.
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Gateway failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("gateway request timed out")]
    Timeout,

    #[error("gateway unreachable: {0}")]
    Network(String),

    #[error("gateway rejected credentials")]
    Authentication,

    #[error("gateway rejected order ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Timeout | GatewayError::Network(_))
    }
}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        DomainError::new(ErrorCode::UpstreamError, err.to_string()).with_detail("service", "payment gateway")
    }
}
