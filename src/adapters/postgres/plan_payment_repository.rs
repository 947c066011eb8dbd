//! PostgreSQL implementation of PlanPaymentRepository.
//!
//! Settlement is a single conditional `UPDATE ... WHERE payment_status =
//! 'Under Process'`, so concurrent verifications of one payment leave
//! exactly one winner without explicit locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{
    BillingPeriod, Money, PaymentState, PaymentStatus, PlanPayment, RejectedCallback,
    SubscriptionStatus,
};
use crate::domain::foundation::{
    DomainError, ErrorCode, OrganizationId, PlanId, PlanPaymentId, Timestamp, ValidationError,
};
use crate::ports::{LatestPaymentScope, PlanPaymentRepository, SettleOutcome, Settlement};

const PAYMENT_COLUMNS: &str = "id, organization_id, plan_id, amount_minor, currency, payment_date, \
     start_date, end_date, payment_status, subscription_status, order_id, payment_id, \
     rejected_payment_id, rejected_order_id, created_at, updated_at";

pub struct PostgresPlanPaymentRepository {
    pool: PgPool,
}

impl PostgresPlanPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanPaymentRow {
    id: Uuid,
    organization_id: Uuid,
    plan_id: Uuid,
    amount_minor: i64,
    currency: String,
    payment_date: DateTime<Utc>,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    payment_status: String,
    subscription_status: String,
    order_id: String,
    payment_id: Option<String>,
    rejected_payment_id: Option<String>,
    rejected_order_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanPaymentRow> for PlanPayment {
    type Error = DomainError;

    fn try_from(row: PlanPaymentRow) -> Result<Self, Self::Error> {
        let state = parse_state(&row.payment_status, &row.subscription_status)?;
        let amount = Money::from_minor(row.amount_minor, &row.currency).map_err(corrupt_row)?;
        let period = BillingPeriod::from_bounds(
            Timestamp::from_datetime(row.start_date),
            Timestamp::from_datetime(row.end_date),
        )
        .map_err(corrupt_row)?;
        let rejected_callback = match (row.rejected_payment_id, row.rejected_order_id) {
            (Some(gateway_payment_id), Some(gateway_order_id)) => Some(RejectedCallback {
                gateway_payment_id,
                gateway_order_id,
            }),
            _ => None,
        };

        Ok(PlanPayment {
            id: PlanPaymentId::from_uuid(row.id),
            organization_id: OrganizationId::from_uuid(row.organization_id),
            plan_id: PlanId::from_uuid(row.plan_id),
            amount,
            payment_date: Timestamp::from_datetime(row.payment_date),
            period,
            state,
            gateway_order_id: row.order_id,
            gateway_payment_id: row.payment_id,
            rejected_callback,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_state(payment_status: &str, subscription_status: &str) -> Result<PaymentState, DomainError> {
    let payment: PaymentStatus = payment_status.parse().map_err(corrupt_row)?;
    let subscription: SubscriptionStatus = subscription_status.parse().map_err(corrupt_row)?;
    PaymentState::from_statuses(payment, subscription).map_err(corrupt_row)
}

fn corrupt_row(e: ValidationError) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Invalid plan payment row: {}", e),
    )
}

fn query_failed(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl PlanPaymentRepository for PostgresPlanPaymentRepository {
    async fn insert(&self, payment: &PlanPayment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO plan_payments (
                id, organization_id, plan_id, amount_minor, currency, payment_date,
                start_date, end_date, payment_status, subscription_status, order_id,
                payment_id, rejected_payment_id, rejected_order_id, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.organization_id.as_uuid())
        .bind(payment.plan_id.as_uuid())
        .bind(payment.amount.minor_units())
        .bind(payment.amount.currency())
        .bind(payment.payment_date.as_datetime())
        .bind(payment.period.start().as_datetime())
        .bind(payment.period.end().as_datetime())
        .bind(payment.payment_status().as_str())
        .bind(payment.subscription_status().as_str())
        .bind(&payment.gateway_order_id)
        .bind(&payment.gateway_payment_id)
        .bind(payment.rejected_callback.as_ref().map(|c| c.gateway_payment_id.as_str()))
        .bind(payment.rejected_callback.as_ref().map(|c| c.gateway_order_id.as_str()))
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| query_failed("insert plan payment", e))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PlanPaymentId) -> Result<Option<PlanPayment>, DomainError> {
        let sql = format!("SELECT {} FROM plan_payments WHERE id = $1", PAYMENT_COLUMNS);
        sqlx::query_as::<_, PlanPaymentRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("load plan payment", e))?
            .map(PlanPayment::try_from)
            .transpose()
    }

    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PlanPayment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM plan_payments WHERE payment_id = $1",
            PAYMENT_COLUMNS
        );
        sqlx::query_as::<_, PlanPaymentRow>(&sql)
            .bind(gateway_payment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("load plan payment by gateway id", e))?
            .map(PlanPayment::try_from)
            .transpose()
    }

    async fn find_latest_for_organization(
        &self,
        organization_id: &OrganizationId,
        scope: LatestPaymentScope,
    ) -> Result<Option<PlanPayment>, DomainError> {
        let filter = match scope {
            LatestPaymentScope::Any => "",
            LatestPaymentScope::ActiveSubscription => "AND subscription_status = 'active'",
        };
        let sql = format!(
            "SELECT {} FROM plan_payments WHERE organization_id = $1 {} \
             ORDER BY end_date DESC, created_at DESC LIMIT 1",
            PAYMENT_COLUMNS, filter
        );
        sqlx::query_as::<_, PlanPaymentRow>(&sql)
            .bind(organization_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("load latest plan payment", e))?
            .map(PlanPayment::try_from)
            .transpose()
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

        let sql = format!(
            r#"
            UPDATE plan_payments SET
                payment_status = $2,
                subscription_status = $3,
                payment_id = COALESCE($4, payment_id),
                order_id = COALESCE($5, order_id),
                rejected_payment_id = COALESCE($8, rejected_payment_id),
                rejected_order_id = COALESCE($9, rejected_order_id),
                updated_at = $6
            WHERE id = $1 AND payment_status = $7
            RETURNING {}
            "#,
            PAYMENT_COLUMNS
        );
        let updated = sqlx::query_as::<_, PlanPaymentRow>(&sql)
            .bind(id.as_uuid())
            .bind(outcome.payment_status().as_str())
            .bind(outcome.subscription_status().as_str())
            .bind(&settlement.gateway_payment_id)
            .bind(&settlement.gateway_order_id)
            .bind(now.as_datetime())
            .bind(PaymentStatus::UnderProcess.as_str())
            .bind(settlement.rejected_callback.as_ref().map(|c| c.gateway_payment_id.as_str()))
            .bind(settlement.rejected_callback.as_ref().map(|c| c.gateway_order_id.as_str()))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_failed("settle plan payment", e))?;

        if let Some(row) = updated {
            return Ok(SettleOutcome::Settled(PlanPayment::try_from(row)?));
        }

        let current: Option<(String, String)> = sqlx::query_as(
            "SELECT payment_status, subscription_status FROM plan_payments WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| query_failed("load plan payment state", e))?;

        match current {
            Some((payment, subscription)) => Ok(SettleOutcome::AlreadySettled(parse_state(
                &payment,
                &subscription,
            )?)),
            None => Ok(SettleOutcome::NotFound),
        }
    }

    async fn find_pending_opened_before(
        &self,
        opened_before: Timestamp,
    ) -> Result<Vec<PlanPayment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM plan_payments WHERE payment_status = $1 AND created_at < $2 \
             ORDER BY created_at ASC",
            PAYMENT_COLUMNS
        );
        sqlx::query_as::<_, PlanPaymentRow>(&sql)
            .bind(PaymentStatus::UnderProcess.as_str())
            .bind(opened_before.as_datetime())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_failed("list stale plan payments", e))?
            .into_iter()
            .map(PlanPayment::try_from)
            .collect()
    }
}
