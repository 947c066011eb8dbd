//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the billing core to external systems:
//! - `postgres` - Durable storage
//! - `memory` - In-process storage for tests and local runs
//! - `razorpay` - Payment gateway orders
//! - `email` - Transactional email via Resend
//! - `invoice` - Invoice templates and PDF rendering
//! - `auth` - Bearer token validation
//! - `http` - Axum routes, middleware and DTOs

pub mod auth;
pub mod email;
pub mod http;
pub mod invoice;
pub mod memory;
pub mod postgres;
pub mod razorpay;
