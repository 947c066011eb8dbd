//! Nexus Billing - multi-tenant subscription billing.
//!
//! Issues payment gateway orders for plan purchases, verifies signed
//! checkout callbacks, activates billing periods exactly once, emails and
//! renders invoices, and gates access on the resulting entitlement.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
