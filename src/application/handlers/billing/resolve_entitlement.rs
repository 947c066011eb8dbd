//! Access gate queries.
//!
//! Every request re-reads the store; entitlement is never cached.

use std::sync::Arc;

use crate::domain::billing::{BillingEntity, BillingError, Entitlement, EntitlementPolicy};
use crate::domain::foundation::{OrganizationId, StaffId, Timestamp};
use crate::domain::tenancy::{Organization, Staff};
use crate::ports::{LatestPaymentScope, PlanPaymentRepository, TenantDirectory};

/// Query for one organization's entitlement.
#[derive(Debug, Clone)]
pub struct ResolveEntitlementQuery {
    pub organization_id: OrganizationId,
}

/// Query for the request context of an authenticated staff member.
#[derive(Debug, Clone)]
pub struct ResolveAccessQuery {
    pub staff_id: StaffId,
}

/// Who is calling and what their organization may access.
#[derive(Debug, Clone)]
pub struct AccessContext {
    pub staff: Staff,
    pub organization: Organization,
    pub entitlement: Entitlement,
}

pub struct ResolveEntitlementHandler {
    payments: Arc<dyn PlanPaymentRepository>,
    tenants: Arc<dyn TenantDirectory>,
    policy: EntitlementPolicy,
}

impl ResolveEntitlementHandler {
    pub fn new(
        payments: Arc<dyn PlanPaymentRepository>,
        tenants: Arc<dyn TenantDirectory>,
        policy: EntitlementPolicy,
    ) -> Self {
        Self {
            payments,
            tenants,
            policy,
        }
    }

    /// Entitlement of an organization.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the organization does not exist
    /// - `OrganizationBlocked` if it is blocked, whatever its payments
    pub async fn handle(&self, query: ResolveEntitlementQuery) -> Result<Entitlement, BillingError> {
        let organization = self.load_organization(&query.organization_id).await?;
        self.entitlement_of(&organization).await
    }

    /// Staff member, organization and entitlement behind a request.
    pub async fn resolve_access(&self, query: ResolveAccessQuery) -> Result<AccessContext, BillingError> {
        let staff = self
            .tenants
            .find_staff(&query.staff_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Staff, query.staff_id))?;
        let organization = self.load_organization(&staff.organization_id).await?;
        let entitlement = self.entitlement_of(&organization).await?;

        Ok(AccessContext {
            staff,
            organization,
            entitlement,
        })
    }

    async fn load_organization(&self, id: &OrganizationId) -> Result<Organization, BillingError> {
        self.tenants
            .find_organization(id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Organization, id))
    }

    async fn entitlement_of(&self, organization: &Organization) -> Result<Entitlement, BillingError> {
        if organization.is_blocked {
            return Err(BillingError::OrganizationBlocked(organization.id));
        }

        let scope = match self.policy {
            EntitlementPolicy::AnyRecord => LatestPaymentScope::Any,
            EntitlementPolicy::SuccessfulPayment => LatestPaymentScope::ActiveSubscription,
        };
        let latest = self
            .payments
            .find_latest_for_organization(&organization.id, scope)
            .await?;

        Ok(Entitlement::from_latest(latest.as_ref(), Timestamp::now()))
    }
}
