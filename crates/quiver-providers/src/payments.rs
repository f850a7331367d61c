// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock payment gateway with scriptable status progression.
//!
//! Checkouts are generated deterministically from plan and method; status
//! polls pop a FIFO queue so tests and demos can walk a payment through
//! its lifecycle.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use quiver_core::error::QuiverError;
use quiver_core::types::{
    Checkout, Payment, PaymentMethod, PaymentStatus, Subscription, SubscriptionPlan,
    SubscriptionStatus,
};
use quiver_core::PaymentGateway;

/// TRC20 deposit address handed out for USDT checkouts.
const USDT_ADDRESS: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
/// Deposit address handed out for BTC checkouts.
const BTC_ADDRESS: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

/// A payment gateway double that never talks to a processor.
///
/// Status polls are popped from a FIFO queue. When the queue is empty,
/// `waiting_for_payment` is reported.
pub struct MockPaymentGateway {
    statuses: Arc<Mutex<VecDeque<PaymentStatus>>>,
}

impl MockPaymentGateway {
    /// Creates a gateway with an empty status queue.
    pub fn new() -> Self {
        Self {
            statuses: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Creates a gateway pre-loaded with the given status progression.
    pub fn with_statuses(statuses: Vec<PaymentStatus>) -> Self {
        Self {
            statuses: Arc::new(Mutex::new(VecDeque::from(statuses))),
        }
    }

    /// Appends a status to the end of the poll queue.
    pub async fn add_status(&self, status: PaymentStatus) {
        self.statuses.lock().await.push_back(status);
    }
}

impl Default for MockPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Price of a plan on a given settlement rail. Yearly carries roughly a
/// 17% discount over twelve monthly cycles.
fn plan_price(plan: SubscriptionPlan, method: PaymentMethod) -> f64 {
    match (plan, method) {
        (SubscriptionPlan::Monthly, PaymentMethod::Usdt) => 9.99,
        (SubscriptionPlan::Monthly, PaymentMethod::Btc) => 0.00025,
        (SubscriptionPlan::Yearly, PaymentMethod::Usdt) => 99.99,
        (SubscriptionPlan::Yearly, PaymentMethod::Btc) => 0.0025,
    }
}

fn deposit_address(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Usdt => USDT_ADDRESS,
        PaymentMethod::Btc => BTC_ADDRESS,
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_checkout(
        &self,
        user_id: i64,
        plan: SubscriptionPlan,
        method: PaymentMethod,
    ) -> Result<Checkout, QuiverError> {
        let now = Utc::now();
        let amount = plan_price(plan, method);
        let address = deposit_address(method);
        let display_currency = method.to_string().to_uppercase();

        let subscription = Subscription {
            id: format!("sub_{}", Uuid::new_v4()),
            user_id,
            plan,
            status: SubscriptionStatus::Pending,
            payment_method: method,
            amount,
            currency: display_currency.clone(),
            starts_at: now,
            expires_at: now + Duration::days(plan.duration_days()),
            created_at: now,
            payment_details: None,
        };

        let payment_id = format!("pay_{}", Uuid::new_v4());
        let payment = Payment {
            id: payment_id.clone(),
            user_id,
            subscription_id: subscription.id.clone(),
            amount,
            currency: display_currency,
            status: PaymentStatus::WaitingForPayment,
            payment_address: address.to_string(),
            payment_amount: amount,
            payment_currency: method.pay_currency().to_string(),
            created_at: now,
            updated_at: now,
            expires_at: now + Duration::hours(2),
            pay_url: Some(format!("https://payments.example.com/pay/{payment_id}")),
            qr_code_url: Some(format!(
                "https://api.qrserver.com/v1/create-qr-code/?size=200x200&data={address}"
            )),
        };

        debug!(
            user_id,
            plan = %plan,
            method = %method,
            payment_id = %payment.id,
            "mock checkout opened"
        );
        Ok(Checkout {
            subscription,
            payment,
        })
    }

    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatus, QuiverError> {
        let status = self
            .statuses
            .lock()
            .await
            .pop_front()
            .unwrap_or(PaymentStatus::WaitingForPayment);
        debug!(payment_id, status = %status, "mock payment status polled");
        Ok(status)
    }
}
