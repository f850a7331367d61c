// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User, subscription, and watchlist ownership.
//!
//! Premium standing is derived on every read from the raw [`Subscription`]
//! and the current instant; it is never cached and never persisted, so a
//! subscription that lapses between mutations stops granting access the
//! moment it expires.

use chrono::{DateTime, Utc};
use quiver_core::types::{
    HostUser, PremiumAccess, Subscription, User, UserSubscriptionStatus, WatchlistItem,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::Database;
use crate::persist::{Persisted, StoreState};

/// User id recorded on watchlist items added before a session exists.
const NO_USER: i64 = 0;

/// Live state of the user store.
#[derive(Debug, Default)]
pub struct UserState {
    pub user: Option<User>,
    pub host: Option<HostUser>,
    pub subscription: Option<Subscription>,
    pub watchlist: Vec<WatchlistItem>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Persisted projection of [`UserState`]. Advisory fields and derived
/// standing are excluded.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserSnapshot {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub host: Option<HostUser>,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    #[serde(default)]
    pub watchlist: Vec<WatchlistItem>,
}

impl StoreState for UserState {
    type Snapshot = UserSnapshot;

    const STORE: &'static str = "user";
    const VERSION: u32 = 1;

    fn capture(&self) -> UserSnapshot {
        UserSnapshot {
            user: self.user.clone(),
            host: self.host.clone(),
            subscription: self.subscription.clone(),
            watchlist: self.watchlist.clone(),
        }
    }

    fn restore(&mut self, snapshot: UserSnapshot) {
        self.user = snapshot.user;
        self.host = snapshot.host;
        self.subscription = snapshot.subscription;
        self.watchlist = snapshot.watchlist;
    }
}

/// Store owning the local user record, the current subscription, and the
/// watchlist.
pub struct UserStore {
    inner: Persisted<UserState>,
}

impl UserStore {
    pub async fn open(db: Database) -> Self {
        Self {
            inner: Persisted::open(db).await,
        }
    }

    pub fn state(&self) -> &UserState {
        self.inner.state()
    }

    pub fn user(&self) -> Option<&User> {
        self.inner.state().user.as_ref()
    }

    pub fn subscription(&self) -> Option<&Subscription> {
        self.inner.state().subscription.as_ref()
    }

    pub fn watchlist(&self) -> &[WatchlistItem] {
        &self.inner.state().watchlist
    }

    /// Create the local user record from the host identity. No-op when a
    /// user already exists; the record survives until an explicit
    /// [`clear`](Self::clear).
    pub async fn initialize_user(&mut self, identity: &HostUser) {
        if self.inner.state().user.is_some() {
            debug!(host_id = identity.id, "user already initialized");
            return;
        }
        let user = User::from_identity(identity, Utc::now());
        let host = identity.clone();
        info!(host_id = identity.id, user_id = user.id, "user initialized");
        self.inner
            .mutate(|s| {
                s.user = Some(user);
                s.host = Some(host);
            })
            .await;
    }

    /// Replace the current subscription wholesale and mirror its standing
    /// onto the user record. A subscription live at call time mirrors
    /// `active`; anything else, including `None`, mirrors `none`.
    pub async fn set_subscription(&mut self, subscription: Option<Subscription>) {
        let now = Utc::now();
        self.inner
            .mutate(|s| {
                if let Some(user) = s.user.as_mut() {
                    let live = subscription.as_ref().is_some_and(|sub| sub.is_live_at(now));
                    user.subscription_status = if live {
                        UserSubscriptionStatus::Active
                    } else {
                        UserSubscriptionStatus::None
                    };
                    user.subscription_type = subscription.as_ref().map(|sub| sub.plan);
                    user.subscription_expires_at = subscription.as_ref().map(|sub| sub.expires_at);
                }
                s.subscription = subscription;
            })
            .await;
    }

    /// Whether the current subscription grants access right now.
    pub fn is_subscribed(&self) -> bool {
        self.is_subscribed_at(Utc::now())
    }

    /// [`is_subscribed`](Self::is_subscribed) against an explicit instant.
    pub fn is_subscribed_at(&self, now: DateTime<Utc>) -> bool {
        self.inner
            .state()
            .subscription
            .as_ref()
            .is_some_and(|sub| sub.is_live_at(now))
    }

    /// Premium capabilities derived from the current subscription.
    pub fn premium_access(&self) -> PremiumAccess {
        self.premium_access_at(Utc::now())
    }

    /// [`premium_access`](Self::premium_access) against an explicit instant.
    pub fn premium_access_at(&self, now: DateTime<Utc>) -> PremiumAccess {
        PremiumAccess::for_subscriber(self.is_subscribed_at(now))
    }

    /// Idempotent insert keyed by coin id. Works without a session; the
    /// item then carries the sentinel user id.
    pub async fn add_to_watchlist(&mut self, coin_id: &str, symbol: &str, name: &str) {
        if self.is_in_watchlist(coin_id) {
            debug!(coin_id, "watchlist insert skipped, coin already present");
            return;
        }
        let item = WatchlistItem {
            id: format!("watchlist_{}", Uuid::new_v4()),
            user_id: self
                .inner
                .state()
                .user
                .as_ref()
                .map_or(NO_USER, |user| user.id),
            coin_id: coin_id.to_string(),
            coin_symbol: symbol.to_string(),
            coin_name: name.to_string(),
            target_price: None,
            alert_enabled: false,
            created_at: Utc::now(),
        };
        self.inner.mutate(|s| s.watchlist.push(item)).await;
    }

    /// Idempotent delete; removing an absent coin is a no-op.
    pub async fn remove_from_watchlist(&mut self, coin_id: &str) {
        if !self.is_in_watchlist(coin_id) {
            return;
        }
        self.inner
            .mutate(|s| s.watchlist.retain(|item| item.coin_id != coin_id))
            .await;
    }

    /// Update only the provided alert fields on the matching watchlist
    /// item; no-op when the coin is not in the watchlist.
    pub async fn update_watchlist_alert(
        &mut self,
        coin_id: &str,
        target_price: Option<f64>,
        alert_enabled: Option<bool>,
    ) {
        if !self.is_in_watchlist(coin_id) {
            return;
        }
        self.inner
            .mutate(|s| {
                if let Some(item) = s.watchlist.iter_mut().find(|item| item.coin_id == coin_id) {
                    if let Some(price) = target_price {
                        item.target_price = Some(price);
                    }
                    if let Some(enabled) = alert_enabled {
                        item.alert_enabled = enabled;
                    }
                }
            })
            .await;
    }

    pub fn is_in_watchlist(&self, coin_id: &str) -> bool {
        self.inner
            .state()
            .watchlist
            .iter()
            .any(|item| item.coin_id == coin_id)
    }

    /// Reset user, host identity, subscription, and watchlist. Used on
    /// logout.
    pub async fn clear(&mut self) {
        self.inner.mutate(|s| *s = UserState::default()).await;
    }

    pub async fn set_loading(&mut self, loading: bool) {
        self.inner.mutate(|s| s.loading = loading).await;
    }

    pub async fn set_error(&mut self, error: Option<String>) {
        self.inner.mutate(|s| s.error = error).await;
    }
}
