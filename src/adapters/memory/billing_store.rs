//! In-memory billing store.
//!
//! One lock guards every table so `settle_pending` is a true
//! check-and-set, matching the conditional UPDATE of the Postgres adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::{PaymentState, Plan, PlanPayment};
use crate::domain::foundation::{
    DomainError, OrganizationId, PlanId, PlanPaymentId, StaffId, Timestamp, ValidationError,
};
use crate::domain::tenancy::{Organization, Staff, SystemPreference};
use crate::ports::{
    LatestPaymentScope, PlanCatalog, PlanPaymentRepository, SettleOutcome, Settlement,
    TenantDirectory,
};

#[derive(Debug, Default)]
struct Tables {
    payments: HashMap<PlanPaymentId, PlanPayment>,
    organizations: HashMap<OrganizationId, Organization>,
    staff: HashMap<StaffId, Staff>,
    plans: HashMap<PlanId, Plan>,
    preferences: HashMap<OrganizationId, SystemPreference>,
}

/// In-memory implementation of the billing persistence ports.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBillingStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBillingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put_organization(&self, organization: Organization) {
        self.tables
            .write()
            .await
            .organizations
            .insert(organization.id, organization);
    }

    pub async fn put_staff(&self, staff: Staff) {
        self.tables.write().await.staff.insert(staff.id, staff);
    }

    pub async fn put_plan(&self, plan: Plan) {
        self.tables.write().await.plans.insert(plan.id, plan);
    }

    pub async fn put_preferences(&self, preferences: SystemPreference) {
        self.tables
            .write()
            .await
            .preferences
            .insert(preferences.organization_id, preferences);
    }

    /// Stores a payment as-is, in any state. Test fixture helper.
    pub async fn put_payment(&self, payment: PlanPayment) {
        self.tables.write().await.payments.insert(payment.id, payment);
    }

    /// Sets or clears the administrative block on an organization.
    pub async fn set_blocked(&self, organization_id: &OrganizationId, blocked: bool) {
        if let Some(org) = self.tables.write().await.organizations.get_mut(organization_id) {
            org.is_blocked = blocked;
        }
    }

    /// All payments of an organization, ordered by start date.
    pub async fn payments_for(&self, organization_id: &OrganizationId) -> Vec<PlanPayment> {
        let tables = self.tables.read().await;
        let mut payments: Vec<PlanPayment> = tables
            .payments
            .values()
            .filter(|p| &p.organization_id == organization_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| p.period.start());
        payments
    }

    pub async fn payment_count(&self) -> usize {
        self.tables.read().await.payments.len()
    }
}

#[async_trait]
impl PlanPaymentRepository for InMemoryBillingStore {
    async fn insert(&self, payment: &PlanPayment) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if tables.payments.contains_key(&payment.id) {
            return Err(DomainError::database(format!(
                "duplicate plan payment id {}",
                payment.id
            )));
        }
        tables.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PlanPaymentId) -> Result<Option<PlanPayment>, DomainError> {
        Ok(self.tables.read().await.payments.get(id).cloned())
    }

    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PlanPayment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .find(|p| p.gateway_payment_id.as_deref() == Some(gateway_payment_id))
            .cloned())
    }

    async fn find_latest_for_organization(
        &self,
        organization_id: &OrganizationId,
        scope: LatestPaymentScope,
    ) -> Result<Option<PlanPayment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .payments
            .values()
            .filter(|p| &p.organization_id == organization_id)
            .filter(|p| match scope {
                LatestPaymentScope::Any => true,
                LatestPaymentScope::ActiveSubscription => p.state == PaymentState::Succeeded,
            })
            .max_by_key(|p| (p.period.end(), p.created_at))
            .cloned())
    }

    async fn settle_pending(
        &self,
        id: &PlanPaymentId,
        outcome: PaymentState,
        settlement: Settlement,
        now: Timestamp,
    ) -> Result<SettleOutcome, DomainError> {
        if outcome.is_pending() {
            return Err(ValidationError::invalid_format("outcome", "must be a settled state").into());
        }

        let mut tables = self.tables.write().await;
        let payment = match tables.payments.get_mut(id) {
            Some(payment) => payment,
            None => return Ok(SettleOutcome::NotFound),
        };
        if !payment.is_pending() {
            return Ok(SettleOutcome::AlreadySettled(payment.state));
        }

        payment.settle(
            outcome,
            settlement.gateway_payment_id,
            settlement.gateway_order_id,
            now,
        )?;
        if let Some(callback) = settlement.rejected_callback {
            payment.record_rejected_callback(callback);
        }
        Ok(SettleOutcome::Settled(payment.clone()))
    }

    async fn find_pending_opened_before(
        &self,
        opened_before: Timestamp,
    ) -> Result<Vec<PlanPayment>, DomainError> {
        let tables = self.tables.read().await;
        let mut pending: Vec<PlanPayment> = tables
            .payments
            .values()
            .filter(|p| p.is_pending() && p.created_at.is_before(&opened_before))
            .cloned()
            .collect();
        pending.sort_by_key(|p| p.created_at);
        Ok(pending)
    }
}

#[async_trait]
impl TenantDirectory for InMemoryBillingStore {
    async fn find_staff(&self, id: &StaffId) -> Result<Option<Staff>, DomainError> {
        Ok(self.tables.read().await.staff.get(id).cloned())
    }

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError> {
        Ok(self.tables.read().await.organizations.get(id).cloned())
    }

    async fn find_preferences(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<SystemPreference>, DomainError> {
        Ok(self.tables.read().await.preferences.get(organization_id).cloned())
    }
}

#[async_trait]
impl PlanCatalog for InMemoryBillingStore {
    async fn find_plan(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.tables.read().await.plans.get(id).cloned())
    }
}
