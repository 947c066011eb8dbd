//! Tenant directory port (read side).
//!
//! Billing only reads tenancy records; their lifecycle is managed
//! elsewhere.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrganizationId, StaffId};
use crate::domain::tenancy::{Organization, Staff, SystemPreference};

#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn find_staff(&self, id: &StaffId) -> Result<Option<Staff>, DomainError>;

    async fn find_organization(
        &self,
        id: &OrganizationId,
    ) -> Result<Option<Organization>, DomainError>;

    /// Preferences saved by the organization, if any.
    async fn find_preferences(
        &self,
        organization_id: &OrganizationId,
    ) -> Result<Option<SystemPreference>, DomainError>;
}
