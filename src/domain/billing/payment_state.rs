//! Payment lifecycle state machine.
//!
//! A plan payment is persisted with two status columns. Only three
//! combinations are meaningful, so the domain works with `PaymentState`
//! and derives the column pair from it.
//!
//! ```text
//! Pending (Under Process, inactive) ──► Succeeded (success, active)
//!                                   └─► Failed    (failed,  inactive)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Status of the payment itself, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(rename = "Under Process")]
    UnderProcess,
    #[serde(rename = "success")]
    Success,
    #[serde(rename = "failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::UnderProcess => "Under Process",
            PaymentStatus::Success => "success",
            PaymentStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Under Process" => Ok(PaymentStatus::UnderProcess),
            "success" => Ok(PaymentStatus::Success),
            "failed" => Ok(PaymentStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "payment_status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

/// Whether the subscription bought by a payment is in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            other => Err(ValidationError::invalid_format(
                "subscription_status",
                format!("unknown subscription status '{}'", other),
            )),
        }
    }
}

/// Lifecycle state of a plan payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// Order issued, awaiting the gateway callback.
    Pending,
    /// Signature verified; the period is paid for.
    Succeeded,
    /// Signature rejected or order abandoned.
    Failed,
}

impl PaymentState {
    pub fn payment_status(&self) -> PaymentStatus {
        match self {
            PaymentState::Pending => PaymentStatus::UnderProcess,
            PaymentState::Succeeded => PaymentStatus::Success,
            PaymentState::Failed => PaymentStatus::Failed,
        }
    }

    pub fn subscription_status(&self) -> SubscriptionStatus {
        match self {
            PaymentState::Succeeded => SubscriptionStatus::Active,
            PaymentState::Pending | PaymentState::Failed => SubscriptionStatus::Inactive,
        }
    }

    /// Rebuilds the state from the stored column pair, rejecting combinations
    /// no transition can produce.
    pub fn from_statuses(
        payment: PaymentStatus,
        subscription: SubscriptionStatus,
    ) -> Result<Self, ValidationError> {
        match (payment, subscription) {
            (PaymentStatus::UnderProcess, SubscriptionStatus::Inactive) => Ok(PaymentState::Pending),
            (PaymentStatus::Success, SubscriptionStatus::Active) => Ok(PaymentState::Succeeded),
            (PaymentStatus::Failed, SubscriptionStatus::Inactive) => Ok(PaymentState::Failed),
            (payment, subscription) => Err(ValidationError::invalid_format(
                "payment_state",
                format!(
                    "inconsistent status pair ({}, {})",
                    payment, subscription
                ),
            )),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PaymentState::Pending)
    }
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.payment_status(), self.subscription_status())
    }
}

impl StateMachine for PaymentState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentState::*;
        matches!((self, target), (Pending, Succeeded) | (Pending, Failed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentState::*;
        match self {
            Pending => vec![Succeeded, Failed],
            Succeeded | Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_settle_either_way() {
        assert_eq!(
            PaymentState::Pending.transition_to(PaymentState::Succeeded),
            Ok(PaymentState::Succeeded)
        );
        assert_eq!(
            PaymentState::Pending.transition_to(PaymentState::Failed),
            Ok(PaymentState::Failed)
        );
    }

    #[test]
    fn settled_states_are_terminal() {
        assert!(PaymentState::Succeeded.is_terminal());
        assert!(PaymentState::Failed.is_terminal());
        assert!(!PaymentState::Pending.is_terminal());
    }

    #[test]
    fn success_cannot_be_overwritten_by_failure() {
        assert!(PaymentState::Succeeded.transition_to(PaymentState::Failed).is_err());
        assert!(PaymentState::Failed.transition_to(PaymentState::Succeeded).is_err());
    }

    #[test]
    fn column_pairs_match_states() {
        assert_eq!(PaymentState::Pending.payment_status().as_str(), "Under Process");
        assert_eq!(PaymentState::Pending.subscription_status().as_str(), "inactive");
        assert_eq!(PaymentState::Succeeded.payment_status().as_str(), "success");
        assert_eq!(PaymentState::Succeeded.subscription_status().as_str(), "active");
        assert_eq!(PaymentState::Failed.payment_status().as_str(), "failed");
        assert_eq!(PaymentState::Failed.subscription_status().as_str(), "inactive");
    }

    #[test]
    fn every_state_round_trips_through_its_columns() {
        for state in [PaymentState::Pending, PaymentState::Succeeded, PaymentState::Failed] {
            let rebuilt =
                PaymentState::from_statuses(state.payment_status(), state.subscription_status());
            assert_eq!(rebuilt, Ok(state));
        }
    }

    #[test]
    fn inconsistent_pairs_are_rejected() {
        assert!(PaymentState::from_statuses(PaymentStatus::Success, SubscriptionStatus::Inactive).is_err());
        assert!(PaymentState::from_statuses(PaymentStatus::UnderProcess, SubscriptionStatus::Active).is_err());
    }

    #[test]
    fn statuses_parse_from_stored_strings() {
        assert_eq!("Under Process".parse::<PaymentStatus>(), Ok(PaymentStatus::UnderProcess));
        assert_eq!("active".parse::<SubscriptionStatus>(), Ok(SubscriptionStatus::Active));
        assert!("pending".parse::<PaymentStatus>().is_err());
    }

    #[test]
    fn payment_status_serializes_with_stored_spelling() {
        assert_eq!(serde_json::to_string(&PaymentStatus::UnderProcess).unwrap(), "\"Under Process\"");
    }
}
