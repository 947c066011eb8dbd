//! Billing domain module.
//!
//! Plan purchases, payment verification and the entitlement they grant.
//!
//! # Module Structure
//!
//! - `plan_payment` - PlanPayment aggregate
//! - `payment_state` - PaymentState machine and its stored status columns
//! - `period` - BillingPeriod chaining
//! - `entitlement` - Entitlement derived from the latest payment
//! - `gateway_signature` - HMAC verification of gateway callbacks
//! - `payment_token` - Authenticated encryption of payment ids
//! - `invoice` - Display-ready invoice view
//! - `errors` - BillingError taxonomy

mod entitlement;
mod errors;
mod gateway_signature;
mod invoice;
mod money;
mod payment_state;
mod period;
mod plan;
mod plan_payment;
mod payment_token;

pub use entitlement::{Entitlement, EntitlementPolicy};
pub use errors::{BillingEntity, BillingError};
pub use gateway_signature::GatewaySignatureVerifier;
pub use invoice::{invoice_download_path, BilledTo, Invoice};
pub use money::{currency_symbol, Money};
pub use payment_state::{PaymentState, PaymentStatus, SubscriptionStatus};
pub use payment_token::{PaymentTokenCodec, TokenError};
pub use period::BillingPeriod;
pub use plan::{Plan, MAX_PLAN_DURATION_DAYS};
pub use plan_payment::{PlanPayment, RejectedCallback};
