//! In-memory adapters.
//!
//! Implement the persistence ports without a database. Used by tests and
//! for running the service locally.

mod billing_store;

pub use billing_store::InMemoryBillingStore;
