//! VerifyPaymentHandler - Command handler for gateway checkout callbacks.
//!
//! A payment settles exactly once. The callback signature decides the
//! outcome, the repository's check-and-set decides the winner when
//! callbacks race, and only the winner of a successful settlement sends the
//! invoice email.

use std::sync::Arc;

use crate::domain::billing::{
    BillingEntity, BillingError, GatewaySignatureVerifier, Invoice, PaymentState,
    PaymentTokenCodec, PlanPayment, RejectedCallback,
};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    EmailSender, InvoiceTemplates, PlanCatalog, PlanPaymentRepository, SettleOutcome, Settlement,
    TenantDirectory,
};

use super::invoice_support::{mail_invoice, InvoiceParties, MissingPreferences};

/// Callback fields the client relays from the gateway checkout.
#[derive(Debug, Clone)]
pub struct VerifyPaymentCommand {
    pub gateway_payment_id: String,
    pub gateway_order_id: String,
    pub signature: String,
    pub payment_token: String,
}

/// Result of a verified, activated and notified payment.
#[derive(Debug, Clone)]
pub struct VerifyPaymentResult {
    pub payment: PlanPayment,
    pub invoice: Invoice,
}

pub struct VerifyPaymentHandler {
    payments: Arc<dyn PlanPaymentRepository>,
    tenants: Arc<dyn TenantDirectory>,
    plans: Arc<dyn PlanCatalog>,
    verifier: Arc<GatewaySignatureVerifier>,
    codec: Arc<PaymentTokenCodec>,
    templates: Arc<dyn InvoiceTemplates>,
    email: Arc<dyn EmailSender>,
}

impl VerifyPaymentHandler {
    pub fn new(
        payments: Arc<dyn PlanPaymentRepository>,
        tenants: Arc<dyn TenantDirectory>,
        plans: Arc<dyn PlanCatalog>,
        verifier: Arc<GatewaySignatureVerifier>,
        codec: Arc<PaymentTokenCodec>,
        templates: Arc<dyn InvoiceTemplates>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            payments,
            tenants,
            plans,
            verifier,
            codec,
            templates,
            email,
        }
    }

    pub async fn handle(
        &self,
        cmd: VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, BillingError> {
        for (field, value) in [
            ("paymentId", &cmd.gateway_payment_id),
            ("orderId", &cmd.gateway_order_id),
            ("signature", &cmd.signature),
            ("paymentToken", &cmd.payment_token),
        ] {
            if value.trim().is_empty() {
                return Err(BillingError::validation(field, "is required"));
            }
        }

        // 1. Decode the token into our payment id
        let payment_id = self.codec.decode(&cmd.payment_token).map_err(|e| {
            tracing::warn!(
                order_id = %cmd.gateway_order_id,
                error = %e,
                "Rejected undecodable payment token"
            );
            BillingError::InvalidToken
        })?;

        // 2. Load the payment; terminal records are never re-verified
        let payment = self
            .payments
            .find_by_id(&payment_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Payment, payment_id))?;
        if !payment.is_pending() {
            return Err(BillingError::already_processed(payment.id, payment.state));
        }

        // 3. Authenticate the callback and bind it to this payment's order
        let signature_valid = self.verifier.verify(
            &cmd.gateway_order_id,
            &cmd.gateway_payment_id,
            &cmd.signature,
        );
        let order_matches = payment.gateway_order_id == cmd.gateway_order_id;
        if !(signature_valid && order_matches) {
            tracing::warn!(
                payment_id = %payment.id,
                order_id = %cmd.gateway_order_id,
                signature_valid,
                order_matches,
                "Payment callback failed verification"
            );
            return self.settle_failed(&payment, &cmd).await;
        }

        // 4. Everything the invoice needs must exist before activating
        let parties = InvoiceParties::load(
            self.tenants.as_ref(),
            self.plans.as_ref(),
            &payment,
            MissingPreferences::Reject,
        )
        .await?;

        // 5. Activate; exactly one concurrent caller gets here
        let settled = match self
            .payments
            .settle_pending(
                &payment.id,
                PaymentState::Succeeded,
                Settlement {
                    gateway_payment_id: Some(cmd.gateway_payment_id.clone()),
                    gateway_order_id: Some(cmd.gateway_order_id.clone()),
                    rejected_callback: None,
                },
                Timestamp::now(),
            )
            .await?
        {
            SettleOutcome::Settled(settled) => settled,
            SettleOutcome::AlreadySettled(state) => {
                return Err(BillingError::already_processed(payment.id, state))
            }
            SettleOutcome::NotFound => {
                return Err(BillingError::not_found(BillingEntity::Payment, payment.id))
            }
        };

        tracing::info!(
            payment_id = %settled.id,
            organization_id = %settled.organization_id,
            "Payment verified and subscription activated"
        );

        // 6. Notify; the activation stands even if this fails
        let invoice = parties
            .compose(&settled)
            .map_err(|e| BillingError::notification_failed(settled.id, e.to_string()))?;
        if let Err(reason) = mail_invoice(
            self.templates.as_ref(),
            self.email.as_ref(),
            &invoice,
            &parties.organization.email,
        )
        .await
        {
            tracing::error!(
                payment_id = %settled.id,
                error = %reason,
                "Invoice email failed after activation"
            );
            return Err(BillingError::notification_failed(settled.id, reason));
        }

        Ok(VerifyPaymentResult {
            payment: settled,
            invoice,
        })
    }

    async fn settle_failed(
        &self,
        payment: &PlanPayment,
        cmd: &VerifyPaymentCommand,
    ) -> Result<VerifyPaymentResult, BillingError> {
        let outcome = self
            .payments
            .settle_pending(
                &payment.id,
                PaymentState::Failed,
                Settlement {
                    gateway_payment_id: None,
                    gateway_order_id: None,
                    rejected_callback: Some(RejectedCallback {
                        gateway_payment_id: cmd.gateway_payment_id.clone(),
                        gateway_order_id: cmd.gateway_order_id.clone(),
                    }),
                },
                Timestamp::now(),
            )
            .await?;

        match outcome {
            SettleOutcome::Settled(_) => {
                tracing::info!(
                    payment_id = %payment.id,
                    gateway_payment_id = %cmd.gateway_payment_id,
                    "Payment marked failed"
                );
                Err(BillingError::SignatureMismatch)
            }
            SettleOutcome::AlreadySettled(state) => {
                Err(BillingError::already_processed(payment.id, state))
            }
            SettleOutcome::NotFound => {
                Err(BillingError::not_found(BillingEntity::Payment, payment.id))
            }
        }
    }
}
