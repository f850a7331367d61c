// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local user record, watchlist, and derived premium capabilities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::types::host::HostUser;
use crate::types::subscription::SubscriptionPlan;

/// Denormalized subscription standing mirrored onto the [`User`] record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserSubscriptionStatus {
    None,
    Active,
    Expired,
}

/// Locally owned user record, created once per session when the host
/// identity first becomes available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Locally generated id, monotonic enough via the creation timestamp.
    pub id: i64,
    pub host_id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: bool,
    pub subscription_status: UserSubscriptionStatus,
    #[serde(default)]
    pub subscription_type: Option<SubscriptionPlan>,
    #[serde(default)]
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Builds a fresh user from a host identity with no subscription standing.
    pub fn from_identity(identity: &HostUser, now: DateTime<Utc>) -> Self {
        User {
            id: now.timestamp_millis(),
            host_id: identity.id,
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            username: identity.username.clone(),
            language_code: identity.language_code.clone(),
            is_premium: identity.is_premium,
            subscription_status: UserSubscriptionStatus::None,
            subscription_type: None,
            subscription_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// One coin pinned by the user, denormalized at insertion time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: String,
    pub user_id: i64,
    pub coin_id: String,
    pub coin_symbol: String,
    pub coin_name: String,
    #[serde(default)]
    pub target_price: Option<f64>,
    pub alert_enabled: bool,
    pub created_at: DateTime<Utc>,
}

/// Premium feature capabilities. A pure function of subscription state:
/// all granted or all denied, never independently settable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PremiumAccess {
    pub signals: bool,
    pub advanced_charts: bool,
    pub export: bool,
    pub alerts: bool,
}

impl PremiumAccess {
    /// All four capabilities track the subscriber flag together.
    pub fn for_subscriber(is_subscribed: bool) -> Self {
        PremiumAccess {
            signals: is_subscribed,
            advanced_charts: is_subscribed,
            export: is_subscribed,
            alerts: is_subscribed,
        }
    }
}
