//! Billing handlers.
//!
//! ## Commands
//! - Issuing gateway orders for a plan
//! - Verifying gateway callbacks
//! - Failing stale pending payments
//! - Re-sending invoice emails
//!
//! ## Queries
//! - Rendering invoice PDFs
//! - Resolving entitlement for the access gate

mod create_order;
mod download_invoice;
mod expire_stale_payments;
mod invoice_support;
mod period_calculator;
mod resend_invoice;
mod resolve_entitlement;
mod verify_payment;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use create_order::{CreateOrderCommand, CreateOrderHandler, CreateOrderResult};
pub use expire_stale_payments::{
    ExpireStalePaymentsCommand, ExpireStalePaymentsHandler, ExpireStalePaymentsResult,
    FailPendingPaymentCommand,
};
pub use resend_invoice::{ResendInvoiceCommand, ResendInvoiceHandler, ResendInvoiceResult};
pub use verify_payment::{VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult};

// Queries
pub use download_invoice::{DownloadInvoiceHandler, DownloadInvoiceQuery, DownloadInvoiceResult};
pub use resolve_entitlement::{
    AccessContext, ResolveAccessQuery, ResolveEntitlementHandler, ResolveEntitlementQuery,
};

pub use period_calculator::PeriodCalculator;
