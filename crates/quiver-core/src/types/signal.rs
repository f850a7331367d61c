// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trading-signal snapshots and their filter vocabulary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Direction a signal recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignalType {
    Buy,
    Sell,
    Hold,
}

/// Holding horizon of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyType {
    Day,
    Swing,
    LongTerm,
}

/// Risk class of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// How a tracked signal is performing against its entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PerformanceStatus {
    Pending,
    Profit,
    Loss,
    Stopped,
}

/// Live tracking info attached to a signal once it has traded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalPerformance {
    pub current_price: f64,
    pub profit_loss_percentage: f64,
    pub status: PerformanceStatus,
}

/// One trading signal, immutable once cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradingSignal {
    pub id: String,
    pub coin_id: String,
    pub coin_symbol: String,
    pub coin_name: String,
    pub signal_type: SignalType,
    pub strategy_type: StrategyType,
    pub risk_level: RiskLevel,
    pub entry_price: f64,
    pub target_price: f64,
    pub stop_loss: f64,
    /// Analyst confidence, 0..=100.
    pub confidence: u8,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default)]
    pub performance: Option<SignalPerformance>,
}

impl TradingSignal {
    /// Whether the signal is actionable at `now`: flagged active and not
    /// past its expiry.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at > now
    }
}

/// Status facet for signal listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SignalStatusFilter {
    All,
    Active,
    Expired,
}

/// Feed-side signal query; unset fields do not constrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalQuery {
    pub strategy: Option<StrategyType>,
    pub risk: Option<RiskLevel>,
    pub status: Option<SignalStatusFilter>,
    pub limit: Option<usize>,
}
