//! Subscription entitlement derived from payment history.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::PlanPayment;

/// Which payment records count when deciding entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitlementPolicy {
    /// The latest record by end date counts whatever its status. An order
    /// that was issued but never paid still marks the organization as paid.
    #[default]
    AnyRecord,
    /// Only records whose payment succeeded count.
    SuccessfulPayment,
}

/// What an organization may access right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entitlement {
    /// A qualifying payment record exists.
    pub is_paid: bool,
    /// The latest qualifying record's end date has not passed.
    pub is_subscription_active: bool,
}

impl Entitlement {
    /// No qualifying payment history.
    pub fn none() -> Self {
        Self::default()
    }

    /// Derives entitlement from the latest qualifying record by end date.
    pub fn from_latest(latest: Option<&PlanPayment>, now: Timestamp) -> Self {
        match latest {
            None => Self::none(),
            Some(payment) => Self {
                is_paid: true,
                is_subscription_active: payment.period.covers_up_to(&now),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{BillingPeriod, Money, Plan};
    use crate::domain::foundation::{OrganizationId, PlanId, PlanPaymentId};

    fn payment_ending(end: Timestamp) -> PlanPayment {
        let plan = Plan::new(PlanId::new(), "Pro", Money::from_minor(100, "INR").unwrap(), 30).unwrap();
        PlanPayment::open(
            PlanPaymentId::new(),
            OrganizationId::new(),
            &plan,
            BillingPeriod::from_bounds(end.add_days(-30).unwrap(), end).unwrap(),
            "order_1",
            end.add_days(-30).unwrap(),
        )
    }

    #[test]
    fn no_history_means_no_entitlement() {
        assert_eq!(Entitlement::from_latest(None, Timestamp::now()), Entitlement::none());
    }

    #[test]
    fn future_end_date_is_active() {
        let now = Timestamp::now();
        let entitlement = Entitlement::from_latest(Some(&payment_ending(now.add_days(5).unwrap())), now);
        assert!(entitlement.is_paid);
        assert!(entitlement.is_subscription_active);
    }

    #[test]
    fn past_end_date_is_paid_but_inactive() {
        let now = Timestamp::now();
        let entitlement = Entitlement::from_latest(Some(&payment_ending(now.add_days(-1).unwrap())), now);
        assert!(entitlement.is_paid);
        assert!(!entitlement.is_subscription_active);
    }

    #[test]
    fn end_date_equal_to_now_is_still_active() {
        let now = Timestamp::now();
        let entitlement = Entitlement::from_latest(Some(&payment_ending(now)), now);
        assert!(entitlement.is_subscription_active);
    }

    #[test]
    fn entitlement_serializes_with_client_field_names() {
        let json = serde_json::to_value(Entitlement { is_paid: true, is_subscription_active: false }).unwrap();
        assert_eq!(json["isPaid"], true);
        assert_eq!(json["isSubscriptionActive"], false);
    }

    #[test]
    fn policy_parses_from_config_spelling() {
        let policy: EntitlementPolicy = serde_json::from_str("\"successful_payment\"").unwrap();
        assert_eq!(policy, EntitlementPolicy::SuccessfulPayment);
        assert_eq!(EntitlementPolicy::default(), EntitlementPolicy::AnyRecord);
    }
}
