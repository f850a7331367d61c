// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cost-per-action campaign catalog and per-user completion ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// What a campaign pays out on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RewardType {
    PremiumDays,
    Tokens,
}

/// The user action a campaign verifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CampaignAction {
    AppInstall,
    WalletConnect,
    Registration,
    Deposit,
}

/// One CPA offer from the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpaCampaign {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_type: RewardType,
    pub reward_amount: u32,
    pub action_type: CampaignAction,
    #[serde(default)]
    pub app_url: Option<String>,
    pub tracking_url: String,
    pub requirements: Vec<String>,
    pub is_active: bool,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_completions: Option<u32>,
    pub current_completions: u32,
    pub created_at: DateTime<Utc>,
}

impl CpaCampaign {
    /// Whether the campaign can still be started at `now`: flagged active,
    /// not past its expiry, and under its completion cap. Evaluated per
    /// query, never cached.
    pub fn is_effectively_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.expires_at.is_none_or(|expires| expires > now)
            && self
                .max_completions
                .is_none_or(|cap| self.current_completions < cap)
    }
}

/// Verification status of one completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CompletionStatus {
    Pending,
    Completed,
    Rejected,
}

/// One entry in the per-user completion ledger. Transitions
/// pending -> completed | rejected exactly once; `reward_claimed` flips
/// false -> true only, and only while completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpaCompletion {
    pub id: String,
    pub user_id: i64,
    pub campaign_id: String,
    pub status: CompletionStatus,
    pub reward_claimed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verification_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl CpaCompletion {
    /// Completed and not yet claimed.
    pub fn is_claimable(&self) -> bool {
        self.status == CompletionStatus::Completed && !self.reward_claimed
    }
}

/// Partial update merged into a ledger entry by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionPatch {
    pub status: Option<CompletionStatus>,
    pub reward_claimed: Option<bool>,
    pub completed_at: Option<DateTime<Utc>>,
    pub verification_data: Option<serde_json::Value>,
}

/// Aggregate of claimable rewards for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRewards {
    /// Count of campaigns with a claimable completion.
    pub campaigns: u32,
    /// Summed reward amounts over `premium_days` campaigns.
    pub premium_days: u32,
    /// Summed reward amounts over `tokens` campaigns.
    pub tokens: u32,
}

/// Directory-side campaign query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CampaignQuery {
    pub active_only: bool,
    pub reward_type: Option<RewardType>,
    pub action_type: Option<CampaignAction>,
}
