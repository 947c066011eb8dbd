//! HTTP DTOs (Data Transfer Objects) for billing endpoints.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::application::handlers::billing::{AccessContext, CreateOrderResult};
use crate::domain::billing::{BillingError, PlanPayment};
use crate::domain::foundation::PlanId;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

const MISSING_ORDER_FIELDS: &str = "Please provide both amount and plan ID.";

/// Body of `POST /api/create-order`.
///
/// Both fields are optional on the wire so a missing one surfaces as a
/// validation error rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    /// Plan price in major units, as shown to the customer.
    pub amount: Option<f64>,
    pub plan_id: Option<String>,
}

impl CreateOrderRequest {
    pub fn amount(&self) -> Result<f64, BillingError> {
        self.amount
            .ok_or_else(|| BillingError::validation("amount", MISSING_ORDER_FIELDS))
    }

    pub fn plan_id(&self) -> Result<PlanId, BillingError> {
        let raw = self
            .plan_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| BillingError::validation("planId", MISSING_ORDER_FIELDS))?;
        raw.parse()
            .map_err(|_| BillingError::validation("planId", "must be a valid plan id"))
    }
}

/// Body of `POST /api/verify-payment`, relayed from the gateway checkout.
///
/// Missing fields deserialize empty and are rejected by the handler.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerifyPaymentRequest {
    pub payment_id: String,
    pub order_id: String,
    pub signature: String,
    pub payment_token: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    /// Amount in major units.
    pub amount: f64,
    pub currency: String,
    pub payment_token: String,
}

impl From<CreateOrderResult> for CreateOrderResponse {
    fn from(result: CreateOrderResult) -> Self {
        Self {
            order_id: result.order_id,
            amount: result.amount.as_major(),
            currency: result.amount.currency().to_string(),
            payment_token: result.payment_token,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub message: String,
    pub is_paid: bool,
    pub is_subscription_active: bool,
    pub staff: StaffSummary,
    pub organization: OrganizationSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
}

impl From<AccessContext> for DashboardResponse {
    fn from(context: AccessContext) -> Self {
        Self {
            message: format!("Welcome to the dashboard, {}", context.staff.name),
            is_paid: context.entitlement.is_paid,
            is_subscription_active: context.entitlement.is_subscription_active,
            staff: StaffSummary {
                id: context.staff.id.to_string(),
                name: context.staff.name,
                email: context.staff.email,
            },
            organization: OrganizationSummary {
                id: context.organization.id.to_string(),
                name: context.organization.name,
            },
        }
    }
}

/// A payment after an operational transition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    pub id: String,
    pub payment_status: String,
    pub subscription_status: String,
}

impl From<&PlanPayment> for PaymentStatusResponse {
    fn from(payment: &PlanPayment) -> Self {
        Self {
            id: payment.id.to_string(),
            payment_status: payment.payment_status().as_str().to_string(),
            subscription_status: payment.subscription_status().as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpireStaleResponse {
    pub count: usize,
    pub expired: Vec<String>,
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Stable machine-readable error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
