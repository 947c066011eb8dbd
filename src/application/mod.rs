//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers change payment state; query handlers only read it.

pub mod handlers;

pub use handlers::{
    AccessContext, CreateOrderCommand, CreateOrderHandler, CreateOrderResult,
    DownloadInvoiceHandler, DownloadInvoiceQuery, DownloadInvoiceResult,
    ExpireStalePaymentsCommand, ExpireStalePaymentsHandler, ExpireStalePaymentsResult,
    FailPendingPaymentCommand, PeriodCalculator, ResendInvoiceCommand, ResendInvoiceHandler,
    ResendInvoiceResult, ResolveAccessQuery, ResolveEntitlementHandler, ResolveEntitlementQuery,
    VerifyPaymentCommand, VerifyPaymentHandler, VerifyPaymentResult,
};
