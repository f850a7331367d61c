// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trading-signal cache with categorical filtering.
//!
//! Unlike the coins store, the signal cache itself is persisted: signals
//! are editorial content that should survive a restart even when the feed
//! is unreachable. Live/expired standing is evaluated per read.

use chrono::{DateTime, Utc};
use quiver_core::types::{RiskLevel, SignalStatusFilter, StrategyType, TradingSignal};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::Database;
use crate::persist::{Persisted, StoreState};

fn default_status_filter() -> SignalStatusFilter {
    SignalStatusFilter::Active
}

/// Live state of the signals store.
#[derive(Debug)]
pub struct SignalsState {
    pub signals: Vec<TradingSignal>,
    pub loading: bool,
    pub error: Option<String>,
    /// `None` means every strategy.
    pub strategy_filter: Option<StrategyType>,
    /// `None` means every risk level.
    pub risk_filter: Option<RiskLevel>,
    pub status_filter: SignalStatusFilter,
}

impl Default for SignalsState {
    fn default() -> Self {
        SignalsState {
            signals: Vec::new(),
            loading: false,
            error: None,
            strategy_filter: None,
            risk_filter: None,
            status_filter: default_status_filter(),
        }
    }
}

/// Persisted projection of [`SignalsState`].
#[derive(Debug, Serialize, Deserialize)]
pub struct SignalsSnapshot {
    #[serde(default)]
    pub signals: Vec<TradingSignal>,
    #[serde(default)]
    pub strategy_filter: Option<StrategyType>,
    #[serde(default)]
    pub risk_filter: Option<RiskLevel>,
    #[serde(default = "default_status_filter")]
    pub status_filter: SignalStatusFilter,
}

impl Default for SignalsSnapshot {
    fn default() -> Self {
        SignalsSnapshot {
            signals: Vec::new(),
            strategy_filter: None,
            risk_filter: None,
            status_filter: default_status_filter(),
        }
    }
}

impl StoreState for SignalsState {
    type Snapshot = SignalsSnapshot;

    const STORE: &'static str = "signals";
    const VERSION: u32 = 1;

    fn capture(&self) -> SignalsSnapshot {
        SignalsSnapshot {
            signals: self.signals.clone(),
            strategy_filter: self.strategy_filter,
            risk_filter: self.risk_filter,
            status_filter: self.status_filter,
        }
    }

    fn restore(&mut self, snapshot: SignalsSnapshot) {
        self.signals = snapshot.signals;
        self.strategy_filter = snapshot.strategy_filter;
        self.risk_filter = snapshot.risk_filter;
        self.status_filter = snapshot.status_filter;
    }
}

/// Store owning the signal cache and its filter selection.
pub struct SignalsStore {
    inner: Persisted<SignalsState>,
}

impl SignalsStore {
    pub async fn open(db: Database) -> Self {
        Self {
            inner: Persisted::open(db).await,
        }
    }

    pub fn state(&self) -> &SignalsState {
        self.inner.state()
    }

    pub fn signals(&self) -> &[TradingSignal] {
        &self.inner.state().signals
    }

    /// Wholesale cache refresh; clears the error advisory. Filter
    /// selection is untouched.
    pub async fn set_signals(&mut self, signals: Vec<TradingSignal>) {
        self.inner
            .mutate(|s| {
                s.signals = signals;
                s.error = None;
            })
            .await;
    }

    /// Prepend one signal so it leads the cache order.
    pub async fn add_signal(&mut self, signal: TradingSignal) {
        self.inner.mutate(|s| s.signals.insert(0, signal)).await;
    }

    /// Apply an in-place edit to the matching signal; no-op when the id is
    /// unknown.
    pub async fn update_signal(
        &mut self,
        signal_id: &str,
        update: impl FnOnce(&mut TradingSignal),
    ) {
        let known = self
            .inner
            .state()
            .signals
            .iter()
            .any(|signal| signal.id == signal_id);
        if !known {
            debug!(signal_id, "signal update skipped, unknown id");
            return;
        }
        self.inner
            .mutate(|s| {
                if let Some(signal) = s.signals.iter_mut().find(|signal| signal.id == signal_id) {
                    update(signal);
                }
            })
            .await;
    }

    pub async fn set_strategy_filter(&mut self, strategy: Option<StrategyType>) {
        self.inner.mutate(|s| s.strategy_filter = strategy).await;
    }

    pub async fn set_risk_filter(&mut self, risk: Option<RiskLevel>) {
        self.inner.mutate(|s| s.risk_filter = risk).await;
    }

    pub async fn set_status_filter(&mut self, status: SignalStatusFilter) {
        self.inner.mutate(|s| s.status_filter = status).await;
    }

    /// The list the UI renders: conjunctive categorical filters, then a
    /// stable newest-first order. The cache itself is never reordered.
    pub fn filtered_signals(&self) -> Vec<TradingSignal> {
        self.filtered_signals_at(Utc::now())
    }

    /// [`filtered_signals`](Self::filtered_signals) against an explicit
    /// instant.
    pub fn filtered_signals_at(&self, now: DateTime<Utc>) -> Vec<TradingSignal> {
        let state = self.inner.state();
        let mut filtered: Vec<TradingSignal> = state
            .signals
            .iter()
            .filter(|signal| {
                if state
                    .strategy_filter
                    .is_some_and(|strategy| signal.strategy_type != strategy)
                {
                    return false;
                }
                if state.risk_filter.is_some_and(|risk| signal.risk_level != risk) {
                    return false;
                }
                match state.status_filter {
                    SignalStatusFilter::All => true,
                    SignalStatusFilter::Active => signal.is_live_at(now),
                    SignalStatusFilter::Expired => !signal.is_live_at(now),
                }
            })
            .cloned()
            .collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        filtered
    }

    /// Reset the cache and every filter to defaults.
    pub async fn clear(&mut self) {
        self.inner.mutate(|s| *s = SignalsState::default()).await;
    }

    pub async fn set_loading(&mut self, loading: bool) {
        self.inner.mutate(|s| s.loading = loading).await;
    }

    pub async fn set_error(&mut self, error: Option<String>) {
        self.inner.mutate(|s| s.error = error).await;
    }
}
