//! ResendInvoiceHandler - Re-sends the invoice email for a settled payment.
//!
//! The retry path after `ActivatedButNotificationFailed`. Payment state is
//! never touched.

use std::sync::Arc;

use crate::domain::billing::{BillingEntity, BillingError};
use crate::domain::foundation::PlanPaymentId;
use crate::ports::{EmailSender, InvoiceTemplates, PlanCatalog, PlanPaymentRepository, TenantDirectory};

use super::invoice_support::{mail_invoice, InvoiceParties, MissingPreferences};

#[derive(Debug, Clone)]
pub struct ResendInvoiceCommand {
    pub payment_id: PlanPaymentId,
}

#[derive(Debug, Clone)]
pub struct ResendInvoiceResult {
    pub payment_id: PlanPaymentId,
    pub recipient: String,
}

pub struct ResendInvoiceHandler {
    payments: Arc<dyn PlanPaymentRepository>,
    tenants: Arc<dyn TenantDirectory>,
    plans: Arc<dyn PlanCatalog>,
    templates: Arc<dyn InvoiceTemplates>,
    email: Arc<dyn EmailSender>,
}

impl ResendInvoiceHandler {
    pub fn new(
        payments: Arc<dyn PlanPaymentRepository>,
        tenants: Arc<dyn TenantDirectory>,
        plans: Arc<dyn PlanCatalog>,
        templates: Arc<dyn InvoiceTemplates>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            payments,
            tenants,
            plans,
            templates,
            email,
        }
    }

    pub async fn handle(&self, cmd: ResendInvoiceCommand) -> Result<ResendInvoiceResult, BillingError> {
        let payment = self
            .payments
            .find_by_id(&cmd.payment_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Payment, cmd.payment_id))?;

        let parties = InvoiceParties::load(
            self.tenants.as_ref(),
            self.plans.as_ref(),
            &payment,
            MissingPreferences::UseDefaults,
        )
        .await?;
        let invoice = parties.compose(&payment)?;

        mail_invoice(
            self.templates.as_ref(),
            self.email.as_ref(),
            &invoice,
            &parties.organization.email,
        )
        .await
        .map_err(|reason| BillingError::upstream("email", reason))?;

        tracing::info!(payment_id = %payment.id, "Invoice email re-sent");
        Ok(ResendInvoiceResult {
            payment_id: payment.id,
            recipient: parties.organization.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::billing::test_support::BillingFixture;
    use crate::domain::billing::PaymentState;

    #[tokio::test]
    async fn resends_for_successful_payment() {
        let fixture = BillingFixture::new().await;
        let payment = fixture.paid_order("pay_R1").await;

        let result = fixture
            .resend_invoice_handler()
            .handle(ResendInvoiceCommand { payment_id: payment.id })
            .await
            .unwrap();

        assert_eq!(result.recipient, fixture.organization.email);
        assert_eq!(fixture.email.sent().len(), 1);
        assert_eq!(fixture.find_payment(&payment.id).await.state, PaymentState::Succeeded);
    }

    #[tokio::test]
    async fn pending_payment_has_no_invoice() {
        let fixture = BillingFixture::new().await;
        let pending = fixture.place_order().await.payment;

        let err = fixture
            .resend_invoice_handler()
            .handle(ResendInvoiceCommand { payment_id: pending.id })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NotFound { .. }));
        assert!(fixture.email.sent().is_empty());
    }

    #[tokio::test]
    async fn provider_outage_is_upstream() {
        let fixture = BillingFixture::new().await;
        let payment = fixture.paid_order("pay_R2").await;
        fixture.email.set_failing(true);

        let err = fixture
            .resend_invoice_handler()
            .handle(ResendInvoiceCommand { payment_id: payment.id })
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::Upstream { .. }));
    }
}
