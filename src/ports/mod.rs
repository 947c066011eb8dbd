//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `PlanPaymentRepository` - Payment records and check-and-set settlement
//! - `TenantDirectory` - Staff, organizations and preferences
//! - `PlanCatalog` - Purchasable plans
//!
//! ## External Service Ports
//!
//! - `PaymentGateway` - Order creation at the payment gateway
//! - `EmailSender` - Transactional email delivery
//! - `DocumentRenderer` - HTML to PDF conversion
//! - `InvoiceTemplates` - Invoice email and document composition
//! - `SessionValidator` - Bearer token validation

mod document_renderer;
mod email_sender;
mod invoice_templates;
mod payment_gateway;
mod plan_catalog;
mod plan_payment_repository;
mod session_validator;
mod tenant_directory;

pub use document_renderer::{DocumentRenderer, RenderError};
pub use email_sender::{EmailError, EmailSender, OutgoingEmail};
pub use invoice_templates::{InvoiceTemplates, RenderedEmail, TemplateError};
pub use payment_gateway::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};
pub use plan_catalog::PlanCatalog;
pub use plan_payment_repository::{
    LatestPaymentScope, PlanPaymentRepository, SettleOutcome, Settlement,
};
pub use session_validator::SessionValidator;
pub use tenant_directory::TenantDirectory;
