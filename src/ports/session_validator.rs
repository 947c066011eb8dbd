//! Session validation port for bearer token validation.
//!
//! # Contract
//!
//! Implementations must:
//! - Validate the token signature
//! - Validate the expiry claim
//! - Return `AuthError::InvalidToken` for malformed/bad signature tokens
//! - Return `AuthError::TokenExpired` for expired tokens

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without "Bearer " prefix) and return the staff
    /// member it was issued to.
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
