//! PeriodCalculator - Computes the billing period a new purchase buys.

use std::sync::Arc;

use crate::domain::billing::{BillingError, BillingPeriod};
use crate::domain::foundation::{OrganizationId, Timestamp};
use crate::ports::{LatestPaymentScope, PlanPaymentRepository};

/// Chains new periods onto the organization's paid-through date.
///
/// Two concurrent purchases by one organization may both chain onto the
/// same end date. The later write wins; no per-organization lock is taken.
pub struct PeriodCalculator {
    payments: Arc<dyn PlanPaymentRepository>,
}

impl PeriodCalculator {
    pub fn new(payments: Arc<dyn PlanPaymentRepository>) -> Self {
        Self { payments }
    }

    /// The period for a purchase of `duration_days` made at `now`.
    ///
    /// Starts at the greatest end date among the organization's active
    /// subscriptions, or at `now` when it has none.
    pub async fn compute_next_period(
        &self,
        organization_id: &OrganizationId,
        duration_days: u32,
        now: Timestamp,
    ) -> Result<BillingPeriod, BillingError> {
        let latest_active = self
            .payments
            .find_latest_for_organization(organization_id, LatestPaymentScope::ActiveSubscription)
            .await?;

        Ok(BillingPeriod::next(
            latest_active.map(|payment| payment.period.end()),
            now,
            duration_days,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryBillingStore;
    use crate::domain::billing::{Money, PaymentState, Plan, PlanPayment};
    use crate::domain::foundation::{PlanId, PlanPaymentId};

    fn plan() -> Plan {
        Plan::new(PlanId::new(), "Pro", Money::from_minor(99_900, "INR").unwrap(), 30).unwrap()
    }

    fn payment(org: OrganizationId, start: Timestamp, state: PaymentState) -> PlanPayment {
        let plan = plan();
        let mut payment = PlanPayment::open(
            PlanPaymentId::new(),
            org,
            &plan,
            BillingPeriod::starting_at(start, 30).unwrap(),
            "order_X",
            start,
        );
        payment.state = state;
        payment
    }

    #[tokio::test]
    async fn first_purchase_starts_now() {
        let store = InMemoryBillingStore::new();
        let calculator = PeriodCalculator::new(Arc::new(store));
        let now = Timestamp::now();

        let period = calculator
            .compute_next_period(&OrganizationId::new(), 30, now)
            .await
            .unwrap();

        assert_eq!(period.start(), now);
        assert_eq!(period.end(), now.add_days(30).unwrap());
    }

    #[tokio::test]
    async fn renewal_chains_onto_latest_active_end() {
        let store = InMemoryBillingStore::new();
        let org = OrganizationId::new();
        let now = Timestamp::now();
        let current = payment(org, now.add_days(-10).unwrap(), PaymentState::Succeeded);
        let paid_through = current.period.end();
        store.put_payment(current).await;

        let calculator = PeriodCalculator::new(Arc::new(store));
        let period = calculator.compute_next_period(&org, 90, now).await.unwrap();

        assert_eq!(period.start(), paid_through);
        assert_eq!(period.end(), paid_through.add_days(90).unwrap());
    }

    #[tokio::test]
    async fn pending_and_failed_records_do_not_extend_the_chain() {
        let store = InMemoryBillingStore::new();
        let org = OrganizationId::new();
        let now = Timestamp::now();
        store.put_payment(payment(org, now.add_days(40).unwrap(), PaymentState::Pending)).await;
        store.put_payment(payment(org, now.add_days(80).unwrap(), PaymentState::Failed)).await;

        let calculator = PeriodCalculator::new(Arc::new(store));
        let period = calculator.compute_next_period(&org, 30, now).await.unwrap();

        assert_eq!(period.start(), now);
    }

    #[tokio::test]
    async fn lapsed_active_subscription_still_anchors_the_chain() {
        let store = InMemoryBillingStore::new();
        let org = OrganizationId::new();
        let now = Timestamp::now();
        let lapsed = payment(org, now.add_days(-60).unwrap(), PaymentState::Succeeded);
        let lapsed_end = lapsed.period.end();
        store.put_payment(lapsed).await;

        let calculator = PeriodCalculator::new(Arc::new(store));
        let period = calculator.compute_next_period(&org, 30, now).await.unwrap();

        assert_eq!(period.start(), lapsed_end);
    }

    #[tokio::test]
    async fn other_organizations_are_ignored() {
        let store = InMemoryBillingStore::new();
        let now = Timestamp::now();
        store
            .put_payment(payment(OrganizationId::new(), now, PaymentState::Succeeded))
            .await;

        let calculator = PeriodCalculator::new(Arc::new(store));
        let period = calculator
            .compute_next_period(&OrganizationId::new(), 30, now)
            .await
            .unwrap();

        assert_eq!(period.start(), now);
    }
}
