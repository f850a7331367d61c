// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock trading-signal feed backed by a built-in analyst sheet.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use quiver_core::error::QuiverError;
use quiver_core::types::{
    PerformanceStatus, RiskLevel, SignalPerformance, SignalQuery, SignalStatusFilter, SignalType,
    StrategyType, TradingSignal,
};
use quiver_core::SignalFeed;

/// Page size used when a query names no limit.
const DEFAULT_LIMIT: usize = 20;

/// A signal feed double serving a fixed signal set.
pub struct MockSignalFeed {
    signals: Vec<TradingSignal>,
}

impl MockSignalFeed {
    /// Creates a feed carrying the built-in signal set.
    pub fn new() -> Self {
        Self::with_signals(sample_signals(Utc::now()))
    }

    /// Creates a feed with an explicit signal set.
    pub fn with_signals(signals: Vec<TradingSignal>) -> Self {
        Self { signals }
    }
}

impl Default for MockSignalFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalFeed for MockSignalFeed {
    async fn signals(&self, query: SignalQuery) -> Result<Vec<TradingSignal>, QuiverError> {
        let now = Utc::now();
        let mut listed: Vec<TradingSignal> = self
            .signals
            .iter()
            .filter(|signal| {
                query
                    .strategy
                    .is_none_or(|strategy| signal.strategy_type == strategy)
            })
            .filter(|signal| query.risk.is_none_or(|risk| signal.risk_level == risk))
            .filter(|signal| match query.status {
                None | Some(SignalStatusFilter::All) => true,
                Some(SignalStatusFilter::Active) => signal.is_live_at(now),
                Some(SignalStatusFilter::Expired) => !signal.is_live_at(now),
            })
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listed.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));
        Ok(listed)
    }
}

/// The built-in signal set.
fn sample_signals(now: DateTime<Utc>) -> Vec<TradingSignal> {
    vec![
        TradingSignal {
            id: "signal_1".to_string(),
            coin_id: "bitcoin".to_string(),
            coin_symbol: "BTC".to_string(),
            coin_name: "Bitcoin".to_string(),
            signal_type: SignalType::Buy,
            strategy_type: StrategyType::Swing,
            risk_level: RiskLevel::Medium,
            entry_price: 67_000.0,
            target_price: 72_000.0,
            stop_loss: 64_000.0,
            confidence: 85,
            description: "Bitcoin showing strong support at $67k level with RSI oversold. \
                          Technical indicators suggest a potential bounce to $72k resistance. \
                          Volume confirmation needed."
                .to_string(),
            created_at: now - Duration::hours(2),
            expires_at: now + Duration::days(5),
            is_active: true,
            performance: Some(SignalPerformance {
                current_price: 67_420.0,
                profit_loss_percentage: 0.63,
                status: PerformanceStatus::Pending,
            }),
        },
        TradingSignal {
            id: "signal_2".to_string(),
            coin_id: "ethereum".to_string(),
            coin_symbol: "ETH".to_string(),
            coin_name: "Ethereum".to_string(),
            signal_type: SignalType::Buy,
            strategy_type: StrategyType::Day,
            risk_level: RiskLevel::High,
            entry_price: 2_650.0,
            target_price: 2_780.0,
            stop_loss: 2_580.0,
            confidence: 75,
            description: "ETH breakout above $2650 resistance with high volume. Quick day trade \
                          opportunity targeting $2780. Tight stop loss due to volatile market \
                          conditions."
                .to_string(),
            created_at: now - Duration::hours(4),
            expires_at: now + Duration::days(1),
            is_active: true,
            performance: Some(SignalPerformance {
                current_price: 2_670.0,
                profit_loss_percentage: 0.75,
                status: PerformanceStatus::Pending,
            }),
        },
        TradingSignal {
            id: "signal_3".to_string(),
            coin_id: "chainlink".to_string(),
            coin_symbol: "LINK".to_string(),
            coin_name: "Chainlink".to_string(),
            signal_type: SignalType::Sell,
            strategy_type: StrategyType::Swing,
            risk_level: RiskLevel::Low,
            entry_price: 15.20,
            target_price: 13.80,
            stop_loss: 16.00,
            confidence: 70,
            description: "LINK facing resistance at $15.20 level. RSI overbought and showing \
                          bearish divergence. Conservative sell signal with limited downside \
                          risk."
                .to_string(),
            created_at: now - Duration::hours(6),
            expires_at: now + Duration::days(7),
            is_active: true,
            performance: None,
        },
        TradingSignal {
            id: "signal_4".to_string(),
            coin_id: "solana".to_string(),
            coin_symbol: "SOL".to_string(),
            coin_name: "Solana".to_string(),
            signal_type: SignalType::Buy,
            strategy_type: StrategyType::LongTerm,
            risk_level: RiskLevel::Medium,
            entry_price: 180.0,
            target_price: 250.0,
            stop_loss: 160.0,
            confidence: 90,
            description: "SOL fundamentals remain strong with increasing DeFi adoption. \
                          Long-term accumulation opportunity at current levels. Strong ecosystem \
                          growth expected."
                .to_string(),
            created_at: now - Duration::days(1),
            expires_at: now + Duration::days(30),
            is_active: true,
            performance: Some(SignalPerformance {
                current_price: 185.0,
                profit_loss_percentage: 2.78,
                status: PerformanceStatus::Profit,
            }),
        },
        TradingSignal {
            id: "signal_5".to_string(),
            coin_id: "cardano".to_string(),
            coin_symbol: "ADA".to_string(),
            coin_name: "Cardano".to_string(),
            signal_type: SignalType::Hold,
            strategy_type: StrategyType::LongTerm,
            risk_level: RiskLevel::Low,
            entry_price: 0.45,
            target_price: 0.65,
            stop_loss: 0.38,
            confidence: 65,
            description: "ADA consolidating in range. Upcoming protocol upgrades and \
                          partnerships could drive price higher. Patient holding recommended."
                .to_string(),
            created_at: now - Duration::days(2),
            expires_at: now + Duration::days(45),
            is_active: true,
            performance: None,
        },
    ]
}
