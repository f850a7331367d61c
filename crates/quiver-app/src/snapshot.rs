// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consistent read models assembled from every store in one synchronous
//! pass.

use quiver_core::types::{PendingRewards, PremiumAccess, TradingSignal};
use serde::Serialize;

/// One coherent view across all four stores, derived at a single instant
/// with no await points between the reads. Cross-store decisions (gate on
/// subscription AND reward standing) should come from one of these rather
/// than from separate store reads that could interleave with mutations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    /// Local user id, `None` before a session starts.
    pub user_id: Option<i64>,
    pub is_subscribed: bool,
    pub premium_access: PremiumAccess,
    pub watchlist_coins: usize,
    pub pending_rewards: PendingRewards,
    /// Campaigns the user has a completed ledger entry for.
    pub completed_campaigns: usize,
    pub premium_days_earned: u32,
    pub tokens_earned: u32,
}

/// Premium-gated view over the signal cache.
#[derive(Debug, Clone, PartialEq)]
pub enum SignalsOverview {
    /// Non-subscribers learn only how many signals exist.
    Locked { total: usize },
    /// Subscribers get the filtered listing.
    Unlocked(Vec<TradingSignal>),
}
