//! PlanPayment aggregate.
//!
//! One record per gateway order. It snapshots the plan price and the
//! period at order time and moves through `PaymentState` exactly once.
//!
//! # Invariants
//!
//! - `period.start < period.end`
//! - `state` only changes via `settle`, and only out of `Pending`
//! - `gateway_payment_id` is set once the payment has been verified
//! - `rejected_callback` never feeds `gateway_payment_id`, so a forged
//!   callback cannot claim a real gateway payment id

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    OrganizationId, PlanId, PlanPaymentId, StateMachine, Timestamp, ValidationError,
};

use super::{BillingPeriod, Money, PaymentState, PaymentStatus, Plan, SubscriptionStatus};

/// Gateway order ids carry this prefix; invoices show what follows it.
const ORDER_ID_PREFIX: &str = "order_";

/// Gateway ids carried by a callback that failed verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedCallback {
    pub gateway_payment_id: String,
    pub gateway_order_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPayment {
    pub id: PlanPaymentId,
    pub organization_id: OrganizationId,
    pub plan_id: PlanId,
    /// Plan price at order time.
    pub amount: Money,
    pub payment_date: Timestamp,
    pub period: BillingPeriod,
    pub state: PaymentState,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub rejected_callback: Option<RejectedCallback>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlanPayment {
    /// Opens a pending payment for an order just issued by the gateway.
    pub fn open(
        id: PlanPaymentId,
        organization_id: OrganizationId,
        plan: &Plan,
        period: BillingPeriod,
        gateway_order_id: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            organization_id,
            plan_id: plan.id,
            amount: plan.price.clone(),
            payment_date: now,
            period,
            state: PaymentState::Pending,
            gateway_order_id: gateway_order_id.into(),
            gateway_payment_id: None,
            rejected_callback: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.state.payment_status()
    }

    pub fn subscription_status(&self) -> SubscriptionStatus {
        self.state.subscription_status()
    }

    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// Moves a pending payment to its terminal state.
    ///
    /// Records the gateway identifiers reported by the callback when given.
    pub fn settle(
        &mut self,
        outcome: PaymentState,
        gateway_payment_id: Option<String>,
        gateway_order_id: Option<String>,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(outcome)?;
        if let Some(payment_id) = gateway_payment_id {
            self.gateway_payment_id = Some(payment_id);
        }
        if let Some(order_id) = gateway_order_id {
            self.gateway_order_id = order_id;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Keeps the ids of a rejected callback for audit.
    pub fn record_rejected_callback(&mut self, callback: RejectedCallback) {
        self.rejected_callback = Some(callback);
    }

    /// Gateway order id without its `order_` prefix, as printed on invoices.
    pub fn order_number(&self) -> &str {
        self.gateway_order_id
            .strip_prefix(ORDER_ID_PREFIX)
            .unwrap_or(&self.gateway_order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Plan {
        Plan::new(PlanId::new(), "Pro", Money::from_minor(99_900, "INR").unwrap(), 30).unwrap()
    }

    fn pending() -> PlanPayment {
        let now = Timestamp::now();
        let plan = plan();
        PlanPayment::open(
            PlanPaymentId::new(),
            OrganizationId::new(),
            &plan,
            BillingPeriod::starting_at(now, plan.duration_days).unwrap(),
            "order_Nx12AbC",
            now,
        )
    }

    #[test]
    fn open_snapshots_plan_and_starts_pending() {
        let plan = plan();
        let now = Timestamp::now();
        let payment = PlanPayment::open(
            PlanPaymentId::new(),
            OrganizationId::new(),
            &plan,
            BillingPeriod::starting_at(now, 30).unwrap(),
            "order_1",
            now,
        );

        assert_eq!(payment.amount, plan.price);
        assert_eq!(payment.plan_id, plan.id);
        assert_eq!(payment.payment_status(), PaymentStatus::UnderProcess);
        assert_eq!(payment.subscription_status(), SubscriptionStatus::Inactive);
        assert!(payment.gateway_payment_id.is_none());
    }

    #[test]
    fn settle_success_records_gateway_ids() {
        let mut payment = pending();
        payment
            .settle(
                PaymentState::Succeeded,
                Some("pay_1".to_string()),
                Some("order_Nx12AbC".to_string()),
                Timestamp::now(),
            )
            .unwrap();

        assert_eq!(payment.payment_status(), PaymentStatus::Success);
        assert_eq!(payment.subscription_status(), SubscriptionStatus::Active);
        assert_eq!(payment.gateway_payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn settle_twice_is_rejected_and_keeps_first_outcome() {
        let mut payment = pending();
        payment
            .settle(PaymentState::Succeeded, Some("pay_1".to_string()), None, Timestamp::now())
            .unwrap();

        let second = payment.settle(PaymentState::Failed, Some("pay_2".to_string()), None, Timestamp::now());

        assert!(second.is_err());
        assert_eq!(payment.state, PaymentState::Succeeded);
        assert_eq!(payment.gateway_payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn rejected_callback_is_kept_apart_from_gateway_ids() {
        let mut payment = pending();
        payment.settle(PaymentState::Failed, None, None, Timestamp::now()).unwrap();
        payment.record_rejected_callback(RejectedCallback {
            gateway_payment_id: "pay_forged".to_string(),
            gateway_order_id: "order_other".to_string(),
        });

        assert!(payment.gateway_payment_id.is_none());
        assert_eq!(payment.gateway_order_id, "order_Nx12AbC");
        assert_eq!(
            payment.rejected_callback.as_ref().map(|c| c.gateway_payment_id.as_str()),
            Some("pay_forged")
        );
    }

    #[test]
    fn order_number_strips_gateway_prefix() {
        let mut payment = pending();
        assert_eq!(payment.order_number(), "Nx12AbC");

        payment.gateway_order_id = "legacy-42".to_string();
        assert_eq!(payment.order_number(), "legacy-42");
    }
}
