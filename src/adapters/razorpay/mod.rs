//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port against the Razorpay Orders API.
//! Callback signatures are verified in the domain by
//! `GatewaySignatureVerifier` with the same key secret.
//!
//! # Security
//!
//! - Key secret handled via `secrecy::SecretString`
//! - Every request bounded by the configured timeout

mod mock_gateway;
mod razorpay_gateway;

pub use mock_gateway::MockPaymentGateway;
pub use razorpay_gateway::{RazorpayConfig, RazorpayGateway};
