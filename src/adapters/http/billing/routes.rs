//! Axum router configuration for billing endpoints.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::super::middleware::{access_gate, require_admin_key};
use super::handlers::{
    create_order, dashboard, download_invoice, expire_stale_payments, fail_payment,
    resend_invoice, verify_payment, BillingAppState,
};

/// Routes that need a validated session and resolved organization.
///
/// # Routes
/// - `POST /create-order` - Issue a gateway order
/// - `GET /dashboard` - Entitlement flags for the caller
pub fn gated_routes(state: BillingAppState) -> Router<BillingAppState> {
    Router::new()
        .route("/create-order", post(create_order))
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn_with_state(state, access_gate))
}

/// Routes reached by the gateway checkout and invoice links.
///
/// # Routes
/// - `POST /verify-payment` - Verify a checkout callback (signature authenticated)
/// - `GET /download-invoice/:gateway_payment_id` - Invoice PDF
pub fn public_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/verify-payment", post(verify_payment))
        .route(
            "/download-invoice/:gateway_payment_id",
            get(download_invoice),
        )
}

/// Operator routes, guarded by the admin key.
///
/// # Routes
/// - `POST /admin/payments/expire-stale` - Fail stale pending payments
/// - `POST /admin/payments/:id/fail` - Fail one pending payment
/// - `POST /admin/invoices/:payment_id/resend` - Re-send an invoice email
pub fn admin_routes(state: &BillingAppState) -> Option<Router<BillingAppState>> {
    let key = state.settings.admin_api_key.clone()?;

    Some(
        Router::new()
            .route("/admin/payments/expire-stale", post(expire_stale_payments))
            .route("/admin/payments/:id/fail", post(fail_payment))
            .route("/admin/invoices/:payment_id/resend", post(resend_invoice))
            .route_layer(middleware::from_fn_with_state(key, require_admin_key)),
    )
}

/// Create the complete billing router, suitable for mounting at `/api`.
///
/// Admin routes are only mounted when an admin key is configured.
pub fn billing_router(state: BillingAppState) -> Router<BillingAppState> {
    let router = Router::new()
        .merge(gated_routes(state.clone()))
        .merge(public_routes());

    match admin_routes(&state) {
        Some(admin) => router.merge(admin),
        None => router,
    }
}
