//! Loading and mailing invoices, shared by verification, download and
//! resend.

use crate::domain::billing::{BillingEntity, BillingError, Invoice, Plan, PlanPayment};
use crate::domain::tenancy::{Organization, SystemPreference};
use crate::ports::{EmailSender, InvoiceTemplates, OutgoingEmail, PlanCatalog, TenantDirectory};

/// How to treat an organization with no saved preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MissingPreferences {
    Reject,
    UseDefaults,
}

/// Organization, plan and preferences referenced by a payment.
pub(crate) struct InvoiceParties {
    pub organization: Organization,
    pub plan: Plan,
    pub preferences: SystemPreference,
}

impl InvoiceParties {
    pub(crate) async fn load(
        tenants: &dyn TenantDirectory,
        plans: &dyn PlanCatalog,
        payment: &PlanPayment,
        missing_preferences: MissingPreferences,
    ) -> Result<Self, BillingError> {
        let organization = tenants
            .find_organization(&payment.organization_id)
            .await?
            .ok_or_else(|| {
                BillingError::not_found(BillingEntity::Organization, payment.organization_id)
            })?;

        let plan = plans
            .find_plan(&payment.plan_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Plan, payment.plan_id))?;

        let preferences = match tenants.find_preferences(&payment.organization_id).await? {
            Some(preferences) => preferences,
            None if missing_preferences == MissingPreferences::UseDefaults => {
                SystemPreference::defaults_for(payment.organization_id)
            }
            None => {
                return Err(BillingError::not_found(
                    BillingEntity::Preferences,
                    payment.organization_id,
                ))
            }
        };

        Ok(Self {
            organization,
            plan,
            preferences,
        })
    }

    pub(crate) fn compose(&self, payment: &PlanPayment) -> Result<Invoice, BillingError> {
        Invoice::compose(payment, &self.organization, &self.plan, &self.preferences)
    }
}

/// Renders the invoice email and sends it to `recipient`.
///
/// Returns the failure reason as text; callers decide how it surfaces.
pub(crate) async fn mail_invoice(
    templates: &dyn InvoiceTemplates,
    sender: &dyn EmailSender,
    invoice: &Invoice,
    recipient: &str,
) -> Result<(), String> {
    let rendered = templates.invoice_email(invoice).map_err(|e| e.to_string())?;
    sender
        .send(&OutgoingEmail {
            to: recipient.to_string(),
            subject: rendered.subject,
            html: rendered.html,
            text: rendered.text,
        })
        .await
        .map_err(|e| e.to_string())
}
