//! Authentication types for the domain layer.
//!
//! These types represent a staff member extracted from a validated bearer
//! token. They have no provider dependencies; any token scheme can populate
//! them via the `SessionValidator` port.

use super::StaffId;
use thiserror::Error;

/// Staff member identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The staff member the token was issued to.
    pub id: StaffId,

    /// Email claim, when the issuer includes one.
    pub email: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: StaffId, email: Option<String>) -> Self {
        Self { id, email }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No token was supplied with the request.
    #[error("Authentication token missing")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the staff member no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// The staff member's organization no longer exists.
    #[error("Organization not found")]
    OrganizationNotFound,

    /// The validation backend is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        !self.is_transient()
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_invalid_token_displays_correctly() {
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    }

    #[test]
    fn auth_error_service_unavailable_displays_message() {
        let err = AuthError::service_unavailable("Connection refused");
        assert_eq!(err.to_string(), "Auth service unavailable: Connection refused");
    }

    #[test]
    fn only_service_errors_are_transient() {
        assert!(AuthError::service_unavailable("timeout").is_transient());
        assert!(!AuthError::TokenExpired.is_transient());
        assert!(AuthError::MissingToken.requires_reauthentication());
        assert!(AuthError::UserNotFound.requires_reauthentication());
    }
}
