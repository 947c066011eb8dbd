//! Billing behavior configuration

use serde::Deserialize;

use crate::domain::billing::EntitlementPolicy;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// `any_record` or `successful_payment`
    #[serde(default)]
    pub entitlement_policy: EntitlementPolicy,

    /// Age in minutes after which the sweep fails a pending payment
    #[serde(default = "default_stale_pending_after_mins")]
    pub stale_pending_after_mins: i64,

    /// Seller name printed on invoices
    #[serde(default = "default_company_name")]
    pub company_name: String,
}

impl BillingConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.stale_pending_after_mins <= 0 {
            return Err(ValidationError::InvalidStaleThreshold);
        }
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("billing.company_name"));
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            entitlement_policy: EntitlementPolicy::default(),
            stale_pending_after_mins: default_stale_pending_after_mins(),
            company_name: default_company_name(),
        }
    }
}

fn default_stale_pending_after_mins() -> i64 {
    60
}

fn default_company_name() -> String {
    "Nexus".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BillingConfig::default();
        assert_eq!(config.entitlement_policy, EntitlementPolicy::AnyRecord);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_threshold() {
        let config = BillingConfig {
            stale_pending_after_mins: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStaleThreshold)
        ));
    }

    #[test]
    fn test_policy_deserializes_from_snake_case() {
        let policy: EntitlementPolicy =
            serde_json::from_str("\"successful_payment\"").unwrap();
        assert_eq!(policy, EntitlementPolicy::SuccessfulPayment);
    }
}
