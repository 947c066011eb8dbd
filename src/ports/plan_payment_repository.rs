//! Plan payment repository port.
//!
//! Persists PlanPayment records and owns the one operation that must be
//! atomic: moving a payment out of `Pending`.
//!
//! # Design
//!
//! - **Check-and-set settlement**: `settle_pending` succeeds for exactly one
//!   caller per payment, however many verify concurrently
//! - **Latest by end date**: entitlement and period chaining both read the
//!   record with the greatest end date, filtered by `LatestPaymentScope`

use async_trait::async_trait;

use crate::domain::billing::{PaymentState, PlanPayment, RejectedCallback};
use crate::domain::foundation::{DomainError, OrganizationId, PlanPaymentId, Timestamp};

/// Which records a "latest by end date" lookup considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestPaymentScope {
    /// Every record regardless of state.
    Any,
    /// Records whose subscription is active (payment succeeded).
    ActiveSubscription,
}

/// Gateway identifiers recorded when a payment settles.
///
/// `rejected_callback` is stored apart from the verified ids and is never
/// subject to their uniqueness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    pub gateway_payment_id: Option<String>,
    pub gateway_order_id: Option<String>,
    pub rejected_callback: Option<RejectedCallback>,
}

/// Result of a check-and-set settlement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// This caller moved the payment out of `Pending`; the updated record.
    Settled(PlanPayment),
    /// The payment had already left `Pending`; its current state.
    AlreadySettled(PaymentState),
    /// No payment with that id exists.
    NotFound,
}

#[async_trait]
pub trait PlanPaymentRepository: Send + Sync {
    /// Persist a new pending payment.
    async fn insert(&self, payment: &PlanPayment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PlanPaymentId) -> Result<Option<PlanPayment>, DomainError>;

    /// Find the payment a gateway payment id was recorded against.
    async fn find_by_gateway_payment_id(
        &self,
        gateway_payment_id: &str,
    ) -> Result<Option<PlanPayment>, DomainError>;

    /// The organization's record with the greatest end date within `scope`.
    async fn find_latest_for_organization(
        &self,
        organization_id: &OrganizationId,
        scope: LatestPaymentScope,
    ) -> Result<Option<PlanPayment>, DomainError>;

    /// Atomically move a pending payment to `outcome`.
    ///
    /// Only one caller may observe `Settled` for a given payment.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if `outcome` is `Pending`
    /// - `DatabaseError` on persistence failure
    async fn settle_pending(
        &self,
        id: &PlanPaymentId,
        outcome: PaymentState,
        settlement: Settlement,
        now: Timestamp,
    ) -> Result<SettleOutcome, DomainError>;

    /// Pending payments opened before `opened_before`, oldest first.
    async fn find_pending_opened_before(
        &self,
        opened_before: Timestamp,
    ) -> Result<Vec<PlanPayment>, DomainError>;
}
