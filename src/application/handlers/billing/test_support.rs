//! Shared fixture for billing handler tests.

use std::sync::Arc;

use secrecy::SecretString;

use crate::adapters::email::RecordingEmailSender;
use crate::adapters::invoice::{HtmlInvoiceTemplates, StaticPdfRenderer};
use crate::adapters::memory::InMemoryBillingStore;
use crate::adapters::razorpay::MockPaymentGateway;
use crate::domain::billing::{
    GatewaySignatureVerifier, Money, PaymentState, PaymentTokenCodec, Plan, PlanPayment,
};
use crate::domain::foundation::{OrganizationId, PlanId, PlanPaymentId, StaffId, Timestamp};
use crate::domain::tenancy::{DateFormat, Organization, Staff, SystemPreference};
use crate::ports::{PlanPaymentRepository, SettleOutcome, Settlement};

use super::{
    CreateOrderCommand, CreateOrderHandler, CreateOrderResult, DownloadInvoiceHandler,
    ResendInvoiceHandler, VerifyPaymentHandler,
};

pub(crate) const KEY_SECRET: &str = "rzp_test_secret";

pub(crate) struct BillingFixture {
    pub store: InMemoryBillingStore,
    pub gateway: MockPaymentGateway,
    pub email: RecordingEmailSender,
    pub renderer: StaticPdfRenderer,
    pub codec: Arc<PaymentTokenCodec>,
    pub verifier: Arc<GatewaySignatureVerifier>,
    pub templates: Arc<HtmlInvoiceTemplates>,
    pub organization: Organization,
    pub staff: Staff,
    pub plan: Plan,
}

impl BillingFixture {
    /// Organization with staff, preferences and a 30 day plan at 999.00 INR.
    pub async fn new() -> Self {
        let fixture = Self::without_preferences().await;
        let mut preferences = SystemPreference::defaults_for(fixture.organization.id);
        preferences.date_format = DateFormat::DayMonthYearSlash;
        preferences.currency = "INR".to_string();
        fixture.store.put_preferences(preferences).await;
        fixture
    }

    pub async fn without_preferences() -> Self {
        let store = InMemoryBillingStore::new();

        let mut organization = Organization::new(OrganizationId::new(), "Acme Clinic", "billing@acme.test");
        organization.address = Some("12 MG Road".to_string());
        organization.country = Some("India".to_string());
        organization.phone = Some("+91 98450 00000".to_string());
        let staff = Staff::new(StaffId::new(), organization.id, "Asha Rao", "asha@acme.test");
        let plan = Plan::new(
            PlanId::new(),
            "Pro Monthly",
            Money::from_minor(99_900, "INR").unwrap(),
            30,
        )
        .unwrap();

        store.put_organization(organization.clone()).await;
        store.put_staff(staff.clone()).await;
        store.put_plan(plan.clone()).await;

        Self {
            store,
            gateway: MockPaymentGateway::new(),
            email: RecordingEmailSender::new(),
            renderer: StaticPdfRenderer::new(),
            codec: Arc::new(PaymentTokenCodec::new(&[7u8; 32])),
            verifier: Arc::new(GatewaySignatureVerifier::new(SecretString::new(
                KEY_SECRET.to_string(),
            ))),
            templates: Arc::new(HtmlInvoiceTemplates::new("Nexus", "https://app.nexus.test")),
            organization,
            staff,
            plan,
        }
    }

    pub fn create_order_handler(&self) -> CreateOrderHandler {
        CreateOrderHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.gateway.clone()),
            self.codec.clone(),
            "INR",
        )
    }

    pub fn verify_payment_handler(&self) -> VerifyPaymentHandler {
        VerifyPaymentHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.verifier.clone(),
            self.codec.clone(),
            self.templates.clone(),
            Arc::new(self.email.clone()),
        )
    }

    pub fn download_invoice_handler(&self) -> DownloadInvoiceHandler {
        DownloadInvoiceHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.templates.clone(),
            Arc::new(self.renderer.clone()),
        )
    }

    pub fn resend_invoice_handler(&self) -> ResendInvoiceHandler {
        ResendInvoiceHandler::new(
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.templates.clone(),
            Arc::new(self.email.clone()),
        )
    }

    /// Issues an order for the fixture plan.
    pub async fn place_order(&self) -> CreateOrderResult {
        self.create_order_handler()
            .handle(CreateOrderCommand {
                staff_id: self.staff.id,
                plan_id: self.plan.id,
                amount: 999.0,
            })
            .await
            .unwrap()
    }

    /// Issues an order and settles it as paid without sending email.
    pub async fn paid_order(&self, gateway_payment_id: &str) -> PlanPayment {
        let pending = self.place_order().await.payment;
        let outcome = self
            .store
            .settle_pending(
                &pending.id,
                PaymentState::Succeeded,
                Settlement {
                    gateway_payment_id: Some(gateway_payment_id.to_string()),
                    ..Settlement::default()
                },
                Timestamp::now(),
            )
            .await
            .unwrap();
        match outcome {
            SettleOutcome::Settled(payment) => payment,
            other => panic!("expected settlement, got {:?}", other),
        }
    }

    pub async fn find_payment(&self, id: &PlanPaymentId) -> PlanPayment {
        self.store.find_by_id(id).await.unwrap().unwrap()
    }
}
