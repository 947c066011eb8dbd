//! CreateOrderHandler - Command handler for starting a plan purchase.

use std::sync::Arc;

use rand_core::{OsRng, RngCore};

use crate::domain::billing::{
    BillingEntity, BillingError, Money, PaymentTokenCodec, PlanPayment,
};
use crate::domain::foundation::{PlanId, PlanPaymentId, StaffId, Timestamp};
use crate::ports::{
    CreateOrderRequest, PaymentGateway, PlanCatalog, PlanPaymentRepository, TenantDirectory,
};

use super::PeriodCalculator;

const RECEIPT_BYTES: usize = 10;

/// Command to open an order for a plan.
#[derive(Debug, Clone)]
pub struct CreateOrderCommand {
    pub staff_id: StaffId,
    pub plan_id: PlanId,
    /// Amount the client expects to pay, in major units.
    pub amount: f64,
}

/// Result of a successfully issued order.
#[derive(Debug, Clone)]
pub struct CreateOrderResult {
    pub payment: PlanPayment,
    pub order_id: String,
    /// Amount as confirmed by the gateway.
    pub amount: Money,
    /// Encrypted payment id the client returns with the gateway callback.
    pub payment_token: String,
}

/// Handler for issuing gateway orders.
///
/// Persists one pending `PlanPayment` per successful call. Retrying after a
/// response was lost creates a second pending record.
pub struct CreateOrderHandler {
    tenants: Arc<dyn TenantDirectory>,
    plans: Arc<dyn PlanCatalog>,
    payments: Arc<dyn PlanPaymentRepository>,
    gateway: Arc<dyn PaymentGateway>,
    codec: Arc<PaymentTokenCodec>,
    periods: PeriodCalculator,
    currency: String,
}

impl CreateOrderHandler {
    pub fn new(
        tenants: Arc<dyn TenantDirectory>,
        plans: Arc<dyn PlanCatalog>,
        payments: Arc<dyn PlanPaymentRepository>,
        gateway: Arc<dyn PaymentGateway>,
        codec: Arc<PaymentTokenCodec>,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            tenants,
            plans,
            periods: PeriodCalculator::new(payments.clone()),
            payments,
            gateway,
            codec,
            currency: currency.into(),
        }
    }

    pub async fn handle(&self, cmd: CreateOrderCommand) -> Result<CreateOrderResult, BillingError> {
        // 1. Resolve staff and organization
        let staff = self
            .tenants
            .find_staff(&cmd.staff_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Staff, cmd.staff_id))?;
        let organization = self
            .tenants
            .find_organization(&staff.organization_id)
            .await?
            .ok_or_else(|| {
                BillingError::not_found(BillingEntity::Organization, staff.organization_id)
            })?;
        if organization.is_blocked {
            return Err(BillingError::OrganizationBlocked(organization.id));
        }

        // 2. Resolve plan and check the requested amount against its price
        let plan = self
            .plans
            .find_plan(&cmd.plan_id)
            .await?
            .ok_or_else(|| BillingError::not_found(BillingEntity::Plan, cmd.plan_id))?;
        if !plan.is_active {
            return Err(BillingError::validation(
                "planId",
                "plan is not available for purchase",
            ));
        }
        if plan.price.currency() != self.currency {
            return Err(BillingError::validation(
                "planId",
                format!(
                    "plan is priced in {} but payments are taken in {}",
                    plan.price.currency(),
                    self.currency
                ),
            ));
        }
        let requested = Money::from_major(cmd.amount, &self.currency)?;
        if requested != plan.price {
            return Err(BillingError::validation(
                "amount",
                format!("must equal the plan price {}", plan.price.format_major()),
            ));
        }

        // 3. Compute the period this purchase buys
        let now = Timestamp::now();
        let period = self
            .periods
            .compute_next_period(&organization.id, plan.duration_days, now)
            .await?;

        // 4. Request the order from the gateway
        let order = self
            .gateway
            .create_order(CreateOrderRequest {
                amount_minor: plan.price.minor_units(),
                currency: self.currency.clone(),
                receipt: new_receipt(),
            })
            .await
            .map_err(|e| {
                tracing::error!(organization_id = %organization.id, error = %e, "Gateway order creation failed");
                BillingError::upstream("payment gateway", e.to_string())
            })?;
        let amount = Money::from_minor(order.amount, &order.currency).map_err(|e| {
            BillingError::upstream("payment gateway", format!("invalid order amount: {}", e))
        })?;

        // 5. Persist the pending payment and hand out its token
        let payment = PlanPayment::open(
            PlanPaymentId::new(),
            organization.id,
            &plan,
            period,
            order.id.clone(),
            now,
        );
        self.payments.insert(&payment).await?;

        let payment_token = self
            .codec
            .encode(payment.id)
            .map_err(|e| BillingError::infrastructure(e.to_string()))?;

        tracing::info!(
            payment_id = %payment.id,
            organization_id = %organization.id,
            order_id = %order.id,
            "Order created"
        );

        Ok(CreateOrderResult {
            payment,
            order_id: order.id,
            amount,
            payment_token,
        })
    }
}

/// Random gateway receipt reference.
fn new_receipt() -> String {
    let mut bytes = [0u8; RECEIPT_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
