//! PostgreSQL implementation of PlanCatalog.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Money, Plan};
use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::ports::PlanCatalog;

pub struct PostgresPlanCatalog {
    pool: PgPool,
}

impl PostgresPlanCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_minor: i64,
    currency: String,
    duration_days: i32,
    features: Vec<String>,
    is_active: bool,
}

impl TryFrom<PlanRow> for Plan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let price = Money::from_minor(row.price_minor, &row.currency).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid plan price: {}", e))
        })?;
        let id = row.id;
        let invalid = |reason: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid plan {}: {}", id, reason))
        };
        let duration_days = u32::try_from(row.duration_days)
            .map_err(|_| invalid(format!("duration {}", row.duration_days)))?;

        let mut plan = Plan::new(PlanId::from_uuid(id), row.name, price, duration_days)
            .map_err(|e| invalid(e.to_string()))?;
        plan.description = row.description;
        plan.features = row.features;
        plan.is_active = row.is_active;
        Ok(plan)
    }
}

#[async_trait]
impl PlanCatalog for PostgresPlanCatalog {
    async fn find_plan(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        let row: Option<PlanRow> = sqlx::query_as(
            r#"
            SELECT id, name, description, price_minor, currency, duration_days, features, is_active
            FROM plans
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load plan: {}", e)))?;

        row.map(Plan::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(duration_days: i32) -> PlanRow {
        PlanRow {
            id: Uuid::new_v4(),
            name: "Growth".to_string(),
            description: Some("For growing teams".to_string()),
            price_minor: 199_900,
            currency: "INR".to_string(),
            duration_days,
            features: vec!["Unlimited invoices".to_string()],
            is_active: true,
        }
    }

    #[test]
    fn valid_row_converts() {
        let plan = Plan::try_from(row(365)).unwrap();
        assert_eq!(plan.duration_days, 365);
        assert_eq!(plan.price.minor_units(), 199_900);
    }

    #[test]
    fn non_positive_duration_is_rejected() {
        assert!(Plan::try_from(row(0)).is_err());
        assert!(Plan::try_from(row(-30)).is_err());
    }

    #[test]
    fn oversized_duration_is_rejected() {
        assert!(Plan::try_from(row(i32::MAX)).is_err());
    }

    #[test]
    fn optional_columns_are_carried_over() {
        let plan = Plan::try_from(row(30)).unwrap();
        assert_eq!(plan.description.as_deref(), Some("For growing teams"));
        assert_eq!(plan.features, vec!["Unlimited invoices".to_string()]);
        assert!(plan.is_active);
    }
}
