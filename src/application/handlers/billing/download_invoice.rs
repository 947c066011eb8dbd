//! DownloadInvoiceHandler - Query handler rendering an invoice PDF.
//!
//! Looks the payment up by the gateway's payment id, the reference printed
//! in invoice links. Read-only; safe to call repeatedly.

use std::sync::Arc;

use crate::domain::billing::{BillingEntity, BillingError, Invoice};
use crate::ports::{
    DocumentRenderer, InvoiceTemplates, PlanCatalog, PlanPaymentRepository, TenantDirectory,
};

use super::invoice_support::{InvoiceParties, MissingPreferences};

#[derive(Debug, Clone)]
pub struct DownloadInvoiceQuery {
    pub gateway_payment_id: String,
}

#[derive(Debug, Clone)]
pub struct DownloadInvoiceResult {
    pub invoice: Invoice,
    pub pdf: Vec<u8>,
}

pub struct DownloadInvoiceHandler {
    payments: Arc<dyn PlanPaymentRepository>,
    tenants: Arc<dyn TenantDirectory>,
    plans: Arc<dyn PlanCatalog>,
    templates: Arc<dyn InvoiceTemplates>,
    renderer: Arc<dyn DocumentRenderer>,
}

impl DownloadInvoiceHandler {
    pub fn new(
        payments: Arc<dyn PlanPaymentRepository>,
        tenants: Arc<dyn TenantDirectory>,
        plans: Arc<dyn PlanCatalog>,
        templates: Arc<dyn InvoiceTemplates>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            payments,
            tenants,
            plans,
            templates,
            renderer,
        }
    }

    pub async fn handle(
        &self,
        query: DownloadInvoiceQuery,
    ) -> Result<DownloadInvoiceResult, BillingError> {
        let payment = self
            .payments
            .find_by_gateway_payment_id(&query.gateway_payment_id)
            .await?
            .ok_or_else(|| {
                BillingError::not_found(BillingEntity::Payment, &query.gateway_payment_id)
            })?;

        let parties = InvoiceParties::load(
            self.tenants.as_ref(),
            self.plans.as_ref(),
            &payment,
            MissingPreferences::UseDefaults,
        )
        .await?;
        let invoice = parties.compose(&payment)?;

        let html = self
            .templates
            .invoice_document(&invoice)
            .map_err(|e| BillingError::infrastructure(e.to_string()))?;
        let pdf = self.renderer.render_pdf(&html).await.map_err(|e| {
            tracing::error!(payment_id = %payment.id, error = %e, "Invoice rendering failed");
            BillingError::upstream("document renderer", e.to_string())
        })?;

        Ok(DownloadInvoiceResult { invoice, pdf })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::invoice::StaticPdfRenderer;
    use crate::application::handlers::billing::test_support::BillingFixture;
    use crate::ports::RenderError;

    fn query(id: &str) -> DownloadInvoiceQuery {
        DownloadInvoiceQuery {
            gateway_payment_id: id.to_string(),
        }
    }

    #[tokio::test]
    async fn renders_pdf_for_successful_payment() {
        let fixture = BillingFixture::new().await;
        fixture.paid_order("pay_INV1").await;

        let result = fixture
            .download_invoice_handler()
            .handle(query("pay_INV1"))
            .await
            .unwrap();

        assert_eq!(result.pdf, StaticPdfRenderer::PDF_BYTES);
        assert_eq!(result.invoice.transaction_id, "pay_INV1");
        let rendered = fixture.renderer.rendered();
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains(&fixture.organization.name));
    }

    #[tokio::test]
    async fn repeated_downloads_are_identical() {
        let fixture = BillingFixture::new().await;
        fixture.paid_order("pay_INV1").await;
        let handler = fixture.download_invoice_handler();

        let first = handler.handle(query("pay_INV1")).await.unwrap();
        let second = handler.handle(query("pay_INV1")).await.unwrap();

        assert_eq!(first.pdf, second.pdf);
        assert_eq!(fixture.renderer.rendered()[0], fixture.renderer.rendered()[1]);
    }

    #[tokio::test]
    async fn unknown_gateway_payment_is_not_found() {
        let fixture = BillingFixture::new().await;
        let err = fixture
            .download_invoice_handler()
            .handle(query("pay_missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::NotFound { entity: BillingEntity::Payment, .. }));
    }

    #[tokio::test]
    async fn missing_preferences_fall_back_to_defaults() {
        let fixture = BillingFixture::without_preferences().await;
        fixture.paid_order("pay_INV2").await;

        let result = fixture
            .download_invoice_handler()
            .handle(query("pay_INV2"))
            .await
            .unwrap();

        // Default date format is ISO
        assert_eq!(result.invoice.payment_date.len(), "2024-01-31".len());
        assert_eq!(&result.invoice.payment_date[4..5], "-");
    }

    #[tokio::test]
    async fn renderer_failure_is_upstream() {
        let fixture = BillingFixture::new().await;
        fixture.paid_order("pay_INV3").await;
        fixture.renderer.fail_next(RenderError::EmptyOutput);

        let err = fixture
            .download_invoice_handler()
            .handle(query("pay_INV3"))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::Upstream { .. }));
    }
}
