//! Billing error taxonomy.
//!
//! Every billing operation fails with one of these. Callers can tell
//! "bad input" from "forged callback" from "already done" from "an
//! upstream service is down" without parsing messages.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | Validation | 400 |
//! | NotFound | 404 |
//! | InvalidToken | 400 |
//! | SignatureMismatch | 400 |
//! | AlreadyProcessed | 409 |
//! | OrganizationBlocked | 403 |
//! | ActivatedButNotificationFailed | 500 |
//! | Upstream | 500 |
//! | Infrastructure | 500 |

use std::fmt;

use crate::domain::foundation::{
    DomainError, ErrorCode, OrganizationId, PlanPaymentId, ValidationError,
};

use super::PaymentState;

/// Kinds of record a billing lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingEntity {
    Payment,
    Organization,
    Staff,
    Plan,
    Preferences,
}

impl fmt::Display for BillingEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BillingEntity::Payment => "Payment record",
            BillingEntity::Organization => "Organization",
            BillingEntity::Staff => "Staff member",
            BillingEntity::Plan => "Plan",
            BillingEntity::Preferences => "System preferences",
        };
        f.write_str(s)
    }
}

/// Billing-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingError {
    /// Request input failed validation; nothing was persisted.
    Validation { field: String, message: String },

    /// A referenced record does not exist.
    NotFound { entity: BillingEntity, id: String },

    /// The payment token could not be decrypted or authenticated.
    InvalidToken,

    /// The gateway callback signature did not match.
    SignatureMismatch,

    /// The payment already left the pending state.
    AlreadyProcessed {
        payment_id: PlanPaymentId,
        state: PaymentState,
    },

    /// The organization has been administratively blocked.
    OrganizationBlocked(OrganizationId),

    /// The payment is active but the invoice email could not be sent.
    ActivatedButNotificationFailed {
        payment_id: PlanPaymentId,
        reason: String,
    },

    /// An external service (gateway, email, renderer) failed or timed out.
    Upstream { service: String, message: String },

    /// Storage or other internal failure.
    Infrastructure(String),
}

impl BillingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity: BillingEntity, id: impl ToString) -> Self {
        BillingError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn already_processed(payment_id: PlanPaymentId, state: PaymentState) -> Self {
        BillingError::AlreadyProcessed { payment_id, state }
    }

    pub fn notification_failed(payment_id: PlanPaymentId, reason: impl Into<String>) -> Self {
        BillingError::ActivatedButNotificationFailed {
            payment_id,
            reason: reason.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::Validation { .. } => ErrorCode::ValidationFailed,
            BillingError::NotFound { entity, .. } => match entity {
                BillingEntity::Payment => ErrorCode::PaymentNotFound,
                BillingEntity::Organization => ErrorCode::OrganizationNotFound,
                BillingEntity::Staff => ErrorCode::StaffNotFound,
                BillingEntity::Plan => ErrorCode::PlanNotFound,
                BillingEntity::Preferences => ErrorCode::PreferencesNotFound,
            },
            BillingError::InvalidToken => ErrorCode::InvalidToken,
            BillingError::SignatureMismatch => ErrorCode::SignatureMismatch,
            BillingError::AlreadyProcessed { .. } => ErrorCode::AlreadyProcessed,
            BillingError::OrganizationBlocked(_) => ErrorCode::OrganizationBlocked,
            BillingError::ActivatedButNotificationFailed { .. } => ErrorCode::NotificationFailed,
            BillingError::Upstream { .. } => ErrorCode::UpstreamError,
            BillingError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }

    /// Returns a user-facing error message.
    pub fn message(&self) -> String {
        match self {
            BillingError::Validation { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BillingError::NotFound { entity, .. } => format!("{} not found.", entity),
            BillingError::InvalidToken => "The payment token is invalid.".to_string(),
            BillingError::SignatureMismatch => "The signature is invalid.".to_string(),
            BillingError::AlreadyProcessed { state, .. } => {
                format!("This payment has already been processed ({}).", state)
            }
            BillingError::OrganizationBlocked(_) => "Organization is blocked.".to_string(),
            BillingError::ActivatedButNotificationFailed { .. } => {
                "Payment verified, but the invoice email could not be sent.".to_string()
            }
            BillingError::Upstream { service, .. } => {
                format!("The {} service is unavailable.", service)
            }
            BillingError::Infrastructure(_) => "Internal server error.".to_string(),
        }
    }

    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BillingError::Upstream { .. } | BillingError::Infrastructure(_)
        )
    }
}

impl fmt::Display for BillingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillingError::NotFound { entity, id } => write!(f, "{} not found: {}", entity, id),
            BillingError::ActivatedButNotificationFailed { payment_id, reason } => write!(
                f,
                "Payment {} activated but notification failed: {}",
                payment_id, reason
            ),
            BillingError::Upstream { service, message } => {
                write!(f, "{} failure: {}", service, message)
            }
            BillingError::Infrastructure(message) => write!(f, "Infrastructure error: {}", message),
            other => f.write_str(&other.message()),
        }
    }
}

impl std::error::Error for BillingError {}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        BillingError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => BillingError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::UpstreamError => BillingError::Upstream {
                service: err
                    .details
                    .get("service")
                    .cloned()
                    .unwrap_or_else(|| "upstream".to_string()),
                message: err.message,
            },
            _ => BillingError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_distinguish_failure_classes() {
        assert_eq!(BillingError::InvalidToken.code(), ErrorCode::InvalidToken);
        assert_eq!(BillingError::SignatureMismatch.code(), ErrorCode::SignatureMismatch);
        assert_eq!(
            BillingError::already_processed(PlanPaymentId::new(), PaymentState::Succeeded).code(),
            ErrorCode::AlreadyProcessed
        );
        assert_eq!(
            BillingError::not_found(BillingEntity::Plan, "p").code(),
            ErrorCode::PlanNotFound
        );
        assert_eq!(
            BillingError::notification_failed(PlanPaymentId::new(), "smtp down").code(),
            ErrorCode::NotificationFailed
        );
    }

    #[test]
    fn signature_mismatch_message_is_stable() {
        assert_eq!(BillingError::SignatureMismatch.message(), "The signature is invalid.");
    }

    #[test]
    fn infrastructure_message_hides_details() {
        let err = BillingError::infrastructure("pool timed out after 30s");
        assert_eq!(err.message(), "Internal server error.");
        assert!(err.to_string().contains("pool timed out"));
    }

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(BillingError::upstream("gateway", "timeout").is_retryable());
        assert!(BillingError::infrastructure("db").is_retryable());
        assert!(!BillingError::SignatureMismatch.is_retryable());
        assert!(!BillingError::InvalidToken.is_retryable());
    }

    #[test]
    fn domain_validation_error_keeps_field() {
        let err: BillingError = DomainError::from(ValidationError::empty_field("planId")).into();
        match err {
            BillingError::Validation { field, .. } => assert_eq!(field, "planId"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn database_error_becomes_infrastructure() {
        let err: BillingError = DomainError::database("connection reset").into();
        assert!(matches!(err, BillingError::Infrastructure(_)));
    }
}
