//! HTTP adapter for billing endpoints.
//!
//! - `POST /api/create-order` - Issue a gateway order (session required)
//! - `GET /api/dashboard` - Entitlement flags (session required)
//! - `POST /api/verify-payment` - Verify a gateway checkout callback
//! - `GET /api/download-invoice/:gatewayPaymentId` - Invoice PDF
//! - `POST /api/admin/...` - Operator endpoints (admin key required)

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{BillingApiError, BillingAppState, BillingSettings};
pub use routes::billing_router;
