//! Shared wiring for integration tests: in-memory adapters behind a
//! fully assembled `BillingAppState`.

#![allow(dead_code)]

use std::sync::Arc;

use secrecy::SecretString;

use nexus_billing::adapters::auth::MockSessionValidator;
use nexus_billing::adapters::email::RecordingEmailSender;
use nexus_billing::adapters::http::{BillingAppState, BillingSettings};
use nexus_billing::adapters::invoice::{HtmlInvoiceTemplates, StaticPdfRenderer};
use nexus_billing::adapters::memory::InMemoryBillingStore;
use nexus_billing::adapters::razorpay::MockPaymentGateway;
use nexus_billing::domain::billing::{
    EntitlementPolicy, GatewaySignatureVerifier, Money, PaymentTokenCodec, Plan,
};
use nexus_billing::domain::foundation::{OrganizationId, PlanId, StaffId};
use nexus_billing::domain::tenancy::{Organization, Staff, SystemPreference};

pub const KEY_SECRET: &str = "rzp_test_integration_secret";
pub const SESSION_TOKEN: &str = "session-token-asha";
pub const ADMIN_KEY: &str = "admin-key-0123456789";

pub struct TestApp {
    pub store: InMemoryBillingStore,
    pub gateway: MockPaymentGateway,
    pub email: RecordingEmailSender,
    pub renderer: StaticPdfRenderer,
    pub verifier: Arc<GatewaySignatureVerifier>,
    pub organization: Organization,
    pub staff: Staff,
    pub plan: Plan,
    pub state: BillingAppState,
}

impl TestApp {
    /// One organization with a staff member holding `SESSION_TOKEN`, and a
    /// 30 day plan priced 999.00 INR.
    pub async fn new(policy: EntitlementPolicy) -> Self {
        let store = InMemoryBillingStore::new();
        let gateway = MockPaymentGateway::new();
        let email = RecordingEmailSender::new();
        let renderer = StaticPdfRenderer::new();

        let mut organization =
            Organization::new(OrganizationId::new(), "Acme Clinic", "billing@acme.test");
        organization.address = Some("12 MG Road".to_string());
        organization.country = Some("India".to_string());
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
        store
            .put_preferences(SystemPreference::defaults_for(organization.id))
            .await;

        let verifier = Arc::new(GatewaySignatureVerifier::new(SecretString::new(
            KEY_SECRET.to_string(),
        )));
        let sessions = MockSessionValidator::new().with_staff(SESSION_TOKEN, staff.id);

        let state = BillingAppState {
            payments: Arc::new(store.clone()),
            tenants: Arc::new(store.clone()),
            plans: Arc::new(store.clone()),
            gateway: Arc::new(gateway.clone()),
            email: Arc::new(email.clone()),
            renderer: Arc::new(renderer.clone()),
            templates: Arc::new(HtmlInvoiceTemplates::new("Nexus", "https://app.nexus.test")),
            sessions: Arc::new(sessions),
            codec: Arc::new(PaymentTokenCodec::new(&[42u8; 32])),
            verifier: verifier.clone(),
            settings: BillingSettings {
                currency: "INR".to_string(),
                entitlement_policy: policy,
                stale_pending_after_mins: 60,
                admin_api_key: Some(SecretString::new(ADMIN_KEY.to_string())),
            },
        };

        Self {
            store,
            gateway,
            email,
            renderer,
            verifier,
            organization,
            staff,
            plan,
            state,
        }
    }

    /// Signature the gateway would attach to a checkout callback.
    pub fn sign(&self, order_id: &str, payment_id: &str) -> String {
        self.verifier.sign(order_id, payment_id)
    }
}
