//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to the billing command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use secrecy::SecretString;

use crate::application::handlers::billing::{
    CreateOrderCommand, CreateOrderHandler, DownloadInvoiceHandler, DownloadInvoiceQuery,
    ExpireStalePaymentsCommand, ExpireStalePaymentsHandler, FailPendingPaymentCommand,
    ResendInvoiceCommand, ResendInvoiceHandler, ResolveEntitlementHandler, VerifyPaymentCommand,
    VerifyPaymentHandler,
};
use crate::domain::billing::{
    BillingError, EntitlementPolicy, GatewaySignatureVerifier, PaymentTokenCodec,
};
use crate::domain::foundation::{ErrorCode, PlanPaymentId};
use crate::ports::{
    DocumentRenderer, EmailSender, InvoiceTemplates, PaymentGateway, PlanCatalog,
    PlanPaymentRepository, SessionValidator, TenantDirectory,
};

use super::super::middleware::RequireAccess;
use super::dto::{
    CreateOrderRequest, CreateOrderResponse, DashboardResponse, ErrorResponse,
    ExpireStaleResponse, MessageResponse, PaymentStatusResponse, VerifyPaymentRequest,
};

pub const PAYMENT_VERIFIED_MESSAGE: &str = "Payment verified and invoice sent successfully.";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Non-secret knobs the billing endpoints need at request time.
#[derive(Clone)]
pub struct BillingSettings {
    /// Currency gateway orders are placed in.
    pub currency: String,
    pub entitlement_policy: EntitlementPolicy,
    /// Age after which the sweep fails a pending payment.
    pub stale_pending_after_mins: i64,
    /// Enables the admin routes when set.
    pub admin_api_key: Option<SecretString>,
}

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct BillingAppState {
    pub payments: Arc<dyn PlanPaymentRepository>,
    pub tenants: Arc<dyn TenantDirectory>,
    pub plans: Arc<dyn PlanCatalog>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub email: Arc<dyn EmailSender>,
    pub renderer: Arc<dyn DocumentRenderer>,
    pub templates: Arc<dyn InvoiceTemplates>,
    pub sessions: Arc<dyn SessionValidator>,
    pub codec: Arc<PaymentTokenCodec>,
    pub verifier: Arc<GatewaySignatureVerifier>,
    pub settings: BillingSettings,
}

impl BillingAppState {
    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            self.tenants.clone(),
            self.plans.clone(),
            self.payments.clone(),
            self.gateway.clone(),
            self.codec.clone(),
            self.settings.currency.clone(),
        )
    }

    pub fn verify_payment_handler(&self) -> VerifyPaymentHandler {
        VerifyPaymentHandler::new(
            self.payments.clone(),
            self.tenants.clone(),
            self.plans.clone(),
            self.verifier.clone(),
            self.codec.clone(),
            self.templates.clone(),
            self.email.clone(),
        )
    }

    pub fn download_invoice_handler(&self) -> DownloadInvoiceHandler {
        DownloadInvoiceHandler::new(
            self.payments.clone(),
            self.tenants.clone(),
            self.plans.clone(),
            self.templates.clone(),
            self.renderer.clone(),
        )
    }

    pub fn entitlement_handler(&self) -> ResolveEntitlementHandler {
        ResolveEntitlementHandler::new(
            self.payments.clone(),
            self.tenants.clone(),
            self.settings.entitlement_policy,
        )
    }

    pub fn expire_stale_handler(&self) -> ExpireStalePaymentsHandler {
        ExpireStalePaymentsHandler::new(self.payments.clone())
    }

    pub fn resend_invoice_handler(&self) -> ResendInvoiceHandler {
        ResendInvoiceHandler::new(
            self.payments.clone(),
            self.tenants.clone(),
            self.plans.clone(),
            self.templates.clone(),
            self.email.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Gated Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/create-order - Issue a gateway order for a plan
pub async fn create_order(
    State(state): State<BillingAppState>,
    RequireAccess(access): RequireAccess,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BillingApiError> {
    let request = json_body(payload)?;
    let cmd = CreateOrderCommand {
        staff_id: access.staff.id,
        plan_id: request.plan_id()?,
        amount: request.amount()?,
    };

    let result = state.create_order_handler().handle(cmd).await?;
    Ok(Json(CreateOrderResponse::from(result)))
}

/// GET /api/dashboard - Entitlement flags for the caller's organization
pub async fn dashboard(RequireAccess(access): RequireAccess) -> impl IntoResponse {
    Json(DashboardResponse::from(access))
}

// ════════════════════════════════════════════════════════════════════════════════
// Public Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/verify-payment - Verify a gateway checkout callback
///
/// No bearer token: the gateway signature authenticates the call.
pub async fn verify_payment(
    State(state): State<BillingAppState>,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BillingApiError> {
    let request = json_body(payload)?;
    let cmd = VerifyPaymentCommand {
        gateway_payment_id: request.payment_id,
        gateway_order_id: request.order_id,
        signature: request.signature,
        payment_token: request.payment_token,
    };

    state.verify_payment_handler().handle(cmd).await?;
    Ok(Json(MessageResponse::new(PAYMENT_VERIFIED_MESSAGE)))
}

/// GET /api/download-invoice/:gatewayPaymentId - Invoice PDF
pub async fn download_invoice(
    State(state): State<BillingAppState>,
    Path(gateway_payment_id): Path<String>,
) -> Result<impl IntoResponse, BillingApiError> {
    let result = state
        .download_invoice_handler()
        .handle(DownloadInvoiceQuery { gateway_payment_id })
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=invoice.pdf"),
        ],
        result.pdf,
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Admin Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/admin/payments/:id/fail - Fail one pending payment
pub async fn fail_payment(
    State(state): State<BillingAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, BillingApiError> {
    let payment_id = parse_payment_id(&payment_id)?;
    let payment = state
        .expire_stale_handler()
        .fail_one(FailPendingPaymentCommand { payment_id })
        .await?;
    Ok(Json(PaymentStatusResponse::from(&payment)))
}

/// POST /api/admin/payments/expire-stale - Fail every stale pending payment
pub async fn expire_stale_payments(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, BillingApiError> {
    let result = state
        .expire_stale_handler()
        .handle(ExpireStalePaymentsCommand {
            older_than_mins: state.settings.stale_pending_after_mins,
        })
        .await?;

    Ok(Json(ExpireStaleResponse {
        count: result.expired.len(),
        expired: result.expired.iter().map(ToString::to_string).collect(),
    }))
}

/// POST /api/admin/invoices/:paymentId/resend - Re-send an invoice email
pub async fn resend_invoice(
    State(state): State<BillingAppState>,
    Path(payment_id): Path<String>,
) -> Result<impl IntoResponse, BillingApiError> {
    let payment_id = parse_payment_id(&payment_id)?;
    let result = state
        .resend_invoice_handler()
        .handle(ResendInvoiceCommand { payment_id })
        .await?;
    Ok(Json(MessageResponse::new(format!(
        "Invoice sent to {}",
        result.recipient
    ))))
}

/// Unwraps a JSON body, turning syntax, type and content-type rejections
/// into validation errors so they share the `{code, message}` shape.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, BillingError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| BillingError::validation("body", rejection.body_text()))
}

fn parse_payment_id(raw: &str) -> Result<PlanPaymentId, BillingError> {
    raw.parse()
        .map_err(|_| BillingError::validation("id", "must be a valid payment id"))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts billing errors to HTTP responses.
#[derive(Debug)]
pub struct BillingApiError(pub BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl BillingApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BillingError::Validation { .. }
            | BillingError::InvalidToken
            | BillingError::SignatureMismatch => StatusCode::BAD_REQUEST,
            BillingError::NotFound { .. } => StatusCode::NOT_FOUND,
            BillingError::AlreadyProcessed { .. } => StatusCode::CONFLICT,
            BillingError::OrganizationBlocked(_) => StatusCode::FORBIDDEN,
            BillingError::ActivatedButNotificationFailed { .. }
            | BillingError::Upstream { .. }
            | BillingError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code: ErrorCode = self.0.code();

        if status.is_server_error() {
            tracing::error!(code = %code, error = %self.0, "Billing request failed");
        }

        let body = ErrorResponse::new(code.to_string(), self.0.message());
        (status, Json(body)).into_response()
    }
}
