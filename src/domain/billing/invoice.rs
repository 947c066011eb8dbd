//! Invoice composition.
//!
//! An `Invoice` is the display-ready view of one successful payment. The
//! email and the PDF are both rendered from it, so they always agree.

use serde::Serialize;

use crate::domain::foundation::PlanPaymentId;
use crate::domain::tenancy::{Organization, SystemPreference};

use super::{BillingEntity, BillingError, Money, PaymentState, Plan, PlanPayment};

/// Path, relative to the public base URL, where an invoice PDF is served.
pub fn invoice_download_path(gateway_payment_id: &str) -> String {
    format!("/api/download-invoice/{}", gateway_payment_id)
}

/// Billed-to block on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BilledTo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invoice {
    pub payment_id: PlanPaymentId,
    pub order_number: String,
    pub transaction_id: String,
    pub payment_date: String,
    pub period_start: String,
    pub period_end: String,
    pub plan_name: String,
    pub amount: Money,
    pub amount_display: String,
    pub total_display: String,
    pub billed_to: BilledTo,
    pub download_path: String,
}

impl Invoice {
    /// Builds the invoice for a successful payment.
    ///
    /// Dates use the organization's preferred format. Amounts are shown in
    /// the currency actually charged.
    pub fn compose(
        payment: &PlanPayment,
        organization: &Organization,
        plan: &Plan,
        preferences: &SystemPreference,
    ) -> Result<Self, BillingError> {
        let transaction_id = match (&payment.state, &payment.gateway_payment_id) {
            (PaymentState::Succeeded, Some(id)) => id.clone(),
            _ => return Err(BillingError::not_found(BillingEntity::Payment, payment.id)),
        };

        let format = preferences.date_format;
        let amount_display = payment.amount.display_with_symbol();

        Ok(Self {
            payment_id: payment.id,
            order_number: payment.order_number().to_string(),
            download_path: invoice_download_path(&transaction_id),
            transaction_id,
            payment_date: format.format(payment.payment_date.as_datetime()),
            period_start: format.format(payment.period.start().as_datetime()),
            period_end: format.format(payment.period.end().as_datetime()),
            plan_name: plan.name.clone(),
            amount: payment.amount.clone(),
            total_display: amount_display.clone(),
            amount_display,
            billed_to: BilledTo {
                name: organization.name.clone(),
                email: organization.email.clone(),
                address: organization.postal_address(),
                phone: organization.phone.clone().unwrap_or_default(),
            },
        })
    }

    /// `start - end` as shown on the line item.
    pub fn period_label(&self) -> String {
        format!("{} - {}", self.period_start, self.period_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::BillingPeriod;
    use crate::domain::foundation::{OrganizationId, PlanId, Timestamp};
    use crate::domain::tenancy::DateFormat;
    use chrono::{TimeZone, Utc};

    fn fixture() -> (PlanPayment, Organization, Plan, SystemPreference) {
        let org_id = OrganizationId::new();
        let mut org = Organization::new(org_id, "Acme Clinic", "ops@acme.test");
        org.address = Some("12 MG Road".to_string());
        org.region = Some("Karnataka".to_string());
        org.country = Some("India".to_string());
        org.phone = Some("+91 98450 00000".to_string());

        let plan = Plan::new(PlanId::new(), "Pro Annual", Money::from_minor(1_199_900, "INR").unwrap(), 365).unwrap();
        let paid_at = Timestamp::from_datetime(Utc.with_ymd_and_hms(2024, 2, 1, 10, 0, 0).unwrap());
        let mut payment = PlanPayment::open(
            PlanPaymentId::new(),
            org_id,
            &plan,
            BillingPeriod::starting_at(paid_at, 365).unwrap(),
            "order_Q1w2E3",
            paid_at,
        );
        payment
            .settle(PaymentState::Succeeded, Some("pay_Z9".to_string()), None, paid_at)
            .unwrap();

        let mut prefs = SystemPreference::defaults_for(org_id);
        prefs.date_format = DateFormat::DayMonthYearSlash;
        (payment, org, plan, prefs)
    }

    #[test]
    fn compose_fills_every_display_field() {
        let (payment, org, plan, prefs) = fixture();
        let invoice = Invoice::compose(&payment, &org, &plan, &prefs).unwrap();

        assert_eq!(invoice.order_number, "Q1w2E3");
        assert_eq!(invoice.transaction_id, "pay_Z9");
        assert_eq!(invoice.payment_date, "01/02/2024");
        assert_eq!(invoice.period_label(), "01/02/2024 - 31/01/2025");
        assert_eq!(invoice.plan_name, "Pro Annual");
        assert_eq!(invoice.amount_display, "₹11999.00");
        assert_eq!(invoice.total_display, "₹11999.00");
        assert_eq!(invoice.billed_to.address, "12 MG Road, Karnataka, India");
        assert_eq!(invoice.download_path, "/api/download-invoice/pay_Z9");
    }

    #[test]
    fn compose_is_deterministic() {
        let (payment, org, plan, prefs) = fixture();
        assert_eq!(
            Invoice::compose(&payment, &org, &plan, &prefs).unwrap(),
            Invoice::compose(&payment, &org, &plan, &prefs).unwrap()
        );
    }

    #[test]
    fn unpaid_payment_has_no_invoice() {
        let (mut payment, org, plan, prefs) = fixture();
        payment.state = PaymentState::Failed;

        let err = Invoice::compose(&payment, &org, &plan, &prefs).unwrap_err();
        assert!(matches!(err, BillingError::NotFound { entity: BillingEntity::Payment, .. }));
    }
}
