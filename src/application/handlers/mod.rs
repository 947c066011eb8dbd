//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    // Commands
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult,
    ExpireStalePaymentsCommand, ExpireStalePaymentsHandler, ExpireStalePaymentsResult,
    FailPendingPaymentCommand,
    ResendInvoiceCommand, ResendInvoiceHandler, ResendInvoiceResult,
    VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult,
    // Queries
    AccessContext, DownloadInvoiceHandler, DownloadInvoiceQuery, DownloadInvoiceResult,
    ResolveAccessQuery, ResolveEntitlementHandler, ResolveEntitlementQuery,
    // Services
    PeriodCalculator,
};
