//! Operational transitions out of `Pending`.
//!
//! An order whose callback never arrives stays pending. These commands move
//! such records to `Failed` by hand or in bulk.

use std::sync::Arc;

use crate::domain::billing::{BillingEntity, BillingError, PaymentState, PlanPayment};
use crate::domain::foundation::{PlanPaymentId, Timestamp};
use crate::ports::{PlanPaymentRepository, SettleOutcome, Settlement};

/// Command to fail one pending payment.
#[derive(Debug, Clone)]
pub struct FailPendingPaymentCommand {
    pub payment_id: PlanPaymentId,
}

/// Command to fail every payment pending for longer than `older_than_mins`.
#[derive(Debug, Clone)]
pub struct ExpireStalePaymentsCommand {
    pub older_than_mins: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ExpireStalePaymentsResult {
    pub expired: Vec<PlanPaymentId>,
}

pub struct ExpireStalePaymentsHandler {
    payments: Arc<dyn PlanPaymentRepository>,
}

impl ExpireStalePaymentsHandler {
    pub fn new(payments: Arc<dyn PlanPaymentRepository>) -> Self {
        Self { payments }
    }

    pub async fn fail_one(&self, cmd: FailPendingPaymentCommand) -> Result<PlanPayment, BillingError> {
        match self.fail(&cmd.payment_id).await? {
            SettleOutcome::Settled(payment) => {
                tracing::info!(payment_id = %payment.id, "Pending payment failed manually");
                Ok(payment)
            }
            SettleOutcome::AlreadySettled(state) => {
                Err(BillingError::already_processed(cmd.payment_id, state))
            }
            SettleOutcome::NotFound => {
                Err(BillingError::not_found(BillingEntity::Payment, cmd.payment_id))
            }
        }
    }

    /// Records settled by a callback while the sweep runs are skipped.
    pub async fn handle(
        &self,
        cmd: ExpireStalePaymentsCommand,
    ) -> Result<ExpireStalePaymentsResult, BillingError> {
        if cmd.older_than_mins <= 0 {
            return Err(BillingError::validation(
                "older_than_mins",
                "must be positive",
            ));
        }

        let cutoff = Timestamp::now()
            .minus_minutes(cmd.older_than_mins)
            .ok_or_else(|| BillingError::validation("older_than_mins", "is too large"))?;
        let stale = self.payments.find_pending_opened_before(cutoff).await?;

        let mut result = ExpireStalePaymentsResult::default();
        for payment in stale {
            if let SettleOutcome::Settled(expired) = self.fail(&payment.id).await? {
                result.expired.push(expired.id);
            }
        }

        tracing::info!(count = result.expired.len(), "Expired stale pending payments");
        Ok(result)
    }

    async fn fail(&self, id: &PlanPaymentId) -> Result<SettleOutcome, BillingError> {
        Ok(self
            .payments
            .settle_pending(id, PaymentState::Failed, Settlement::default(), Timestamp::now())
            .await?)
    }
}
