//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions across lifecycle statuses.

use super::ValidationError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// ```ignore
/// let next = PaymentState::Pending.transition_to(PaymentState::Succeeded)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Light {
        Red,
        Green,
        Broken,
    }

    impl StateMachine for Light {
        fn can_transition_to(&self, target: &Self) -> bool {
            self.valid_transitions().contains(target)
        }

        fn valid_transitions(&self) -> Vec<Self> {
            match self {
                Light::Red => vec![Light::Green, Light::Broken],
                Light::Green => vec![Light::Red, Light::Broken],
                Light::Broken => vec![],
            }
        }
    }

    #[test]
    fn valid_transition_returns_target() {
        assert_eq!(Light::Red.transition_to(Light::Green).unwrap(), Light::Green);
    }

    #[test]
    fn invalid_transition_is_rejected_with_both_states_named() {
        let err = Light::Broken.transition_to(Light::Red).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Broken"));
        assert!(message.contains("Red"));
    }

    #[test]
    fn state_without_outgoing_edges_is_terminal() {
        assert!(Light::Broken.is_terminal());
        assert!(!Light::Green.is_terminal());
    }
}
