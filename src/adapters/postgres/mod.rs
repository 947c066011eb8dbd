//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPlanPaymentRepository` - Payment records with conditional settlement
//! - `PostgresTenantDirectory` - Staff, organizations and preferences
//! - `PostgresPlanCatalog` - Purchasable plans

mod plan_catalog;
mod plan_payment_repository;
mod tenant_directory;

pub use plan_catalog::PostgresPlanCatalog;
pub use plan_payment_repository::PostgresPlanPaymentRepository;
pub use tenant_directory::PostgresTenantDirectory;
