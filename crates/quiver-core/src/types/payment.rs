// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment records issued and advanced by the payment processor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::types::subscription::Subscription;

/// Processor-side payment status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    WaitingForPayment,
    Confirming,
    Confirmed,
    Sending,
    PartiallyPaid,
    Finished,
    Failed,
    Refunded,
    Expired,
}

impl PaymentStatus {
    /// Outcomes that settle the payment and may activate a subscription.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Confirmed | PaymentStatus::Finished)
    }

    /// Outcomes from which the payment can never settle.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            PaymentStatus::Failed | PaymentStatus::Refunded | PaymentStatus::Expired
        )
    }
}

/// A payment awaiting settlement, tied to a pending subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub user_id: i64,
    pub subscription_id: String,
    /// Price in the subscription currency.
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    /// Deposit address the user pays to.
    pub payment_address: String,
    /// Amount due on the settlement rail.
    pub payment_amount: f64,
    pub payment_currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub pay_url: Option<String>,
    #[serde(default)]
    pub qr_code_url: Option<String>,
}

/// What the gateway hands back when a checkout is opened: the pending
/// subscription and the payment that will fund it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkout {
    pub subscription: Subscription,
    pub payment: Payment,
}
