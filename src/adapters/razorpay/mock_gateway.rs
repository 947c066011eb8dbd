//! Mock payment gateway for testing.
//!
//! Issues sequential order ids, records every request and can be told to
//! fail the next call.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

#[derive(Default)]
struct MockState {
    issued: u64,
    requests: Vec<CreateOrderRequest>,
    next_error: Option<GatewayError>,
}

/// Mock payment gateway.
#[derive(Clone, Default)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `create_order` call with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        state.issued += 1;
        Ok(GatewayOrder {
            id: format!("order_MOCK{:06}", state.issued),
            amount: request.amount_minor,
            currency: request.currency,
            receipt: Some(request.receipt),
            status: Some("created".to_string()),
        })
    }
}
