//! Plan catalog port (read side).

use async_trait::async_trait;

use crate::domain::billing::Plan;
use crate::domain::foundation::{DomainError, PlanId};

#[async_trait]
pub trait PlanCatalog: Send + Sync {
    async fn find_plan(&self, id: &PlanId) -> Result<Option<Plan>, DomainError>;
}
