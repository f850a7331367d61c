// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Subscription record and its derivation rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionPlan {
    Monthly,
    Yearly,
}

impl SubscriptionPlan {
    /// Length of the access window granted on activation.
    pub fn duration_days(&self) -> i64 {
        match self {
            SubscriptionPlan::Monthly => 30,
            SubscriptionPlan::Yearly => 365,
        }
    }
}

/// Lifecycle status of a subscription record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionStatus {
    Pending,
    Active,
    Expired,
    Cancelled,
}

/// Settlement rail the user pays over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentMethod {
    Usdt,
    Btc,
}

impl PaymentMethod {
    /// Currency code the gateway settles this method in.
    pub fn pay_currency(&self) -> &'static str {
        match self {
            PaymentMethod::Usdt => "usdtrc20",
            PaymentMethod::Btc => "btc",
        }
    }
}

/// Linkage back to the payment that funded a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub payment_id: String,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// The current subscription for a user. At most one is current at a time;
/// setting a new one replaces the prior outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub user_id: i64,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub payment_method: PaymentMethod,
    pub amount: f64,
    pub currency: String,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub payment_details: Option<PaymentDetails>,
}

impl Subscription {
    /// Whether this subscription grants access at `now`. Evaluated on every
    /// read, never cached: wall-clock time advances independently of any
    /// mutation.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SubscriptionStatus::Active && self.expires_at > now
    }
}
