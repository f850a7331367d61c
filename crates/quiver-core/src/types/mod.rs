// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Quiver workspace.

pub mod cpa;
pub mod host;
pub mod market;
pub mod news;
pub mod payment;
pub mod signal;
pub mod subscription;
pub mod user;

use serde::{Deserialize, Serialize};

pub use cpa::{
    CampaignAction, CampaignQuery, CompletionPatch, CompletionStatus, CpaCampaign,
    CpaCompletion, PendingRewards, RewardType,
};
pub use host::{HapticPulse, HostUser, ImpactStyle, NotifyKind};
pub use market::{
    BollingerBands, ChartData, Coin, CoinDetail, CoinFilters, CoinImage, CoinLinks,
    CoinMarketData, Macd, SortDirection, SortField, SortOption, TechnicalIndicators,
};
pub use news::{CurrencyTag, NewsArticle, NewsPage, NewsSource, NewsVotes};
pub use payment::{Checkout, Payment, PaymentStatus};
pub use signal::{
    PerformanceStatus, RiskLevel, SignalPerformance, SignalQuery, SignalStatusFilter,
    SignalType, StrategyType, TradingSignal,
};
pub use subscription::{
    PaymentDetails, PaymentMethod, Subscription, SubscriptionPlan, SubscriptionStatus,
};
pub use user::{PremiumAccess, User, UserSubscriptionStatus, WatchlistItem};

/// Envelope for collaborator responses that may come from built-in fallback
/// data rather than the live upstream. The flag is passed through to the
/// stores; this core takes no other action on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fetched<T> {
    pub data: T,
    pub using_fallback: bool,
}

impl<T> Fetched<T> {
    /// Wraps data served by the live upstream.
    pub fn live(data: T) -> Self {
        Fetched {
            data,
            using_fallback: false,
        }
    }

    /// Wraps built-in fallback data.
    pub fn fallback(data: T) -> Self {
        Fetched {
            data,
            using_fallback: true,
        }
    }
}
