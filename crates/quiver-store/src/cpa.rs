// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Campaign catalog, per-user completion ledger, and reward accounting.
//!
//! The ledger is append-only. A completion transitions
//! `pending -> completed | rejected` exactly once and `reward_claimed`
//! flips false -> true only while completed; patches that would violate
//! the state machine are dropped per-field rather than erroring.

use chrono::{DateTime, Utc};
use quiver_core::types::{
    CompletionPatch, CompletionStatus, CpaCampaign, CpaCompletion, PendingRewards, RewardType,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::db::Database;
use crate::persist::{Persisted, StoreState};

/// Live state of the CPA store.
#[derive(Debug, Default)]
pub struct CpaState {
    pub campaigns: Vec<CpaCampaign>,
    pub completions: Vec<CpaCompletion>,
    pub loading: bool,
    pub error: Option<String>,
    pub premium_days_earned: u32,
    pub tokens_earned: u32,
}

/// Persisted projection of [`CpaState`].
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CpaSnapshot {
    #[serde(default)]
    pub campaigns: Vec<CpaCampaign>,
    #[serde(default)]
    pub completions: Vec<CpaCompletion>,
    #[serde(default)]
    pub premium_days_earned: u32,
    #[serde(default)]
    pub tokens_earned: u32,
}

impl StoreState for CpaState {
    type Snapshot = CpaSnapshot;

    const STORE: &'static str = "cpa";
    const VERSION: u32 = 1;

    fn capture(&self) -> CpaSnapshot {
        CpaSnapshot {
            campaigns: self.campaigns.clone(),
            completions: self.completions.clone(),
            premium_days_earned: self.premium_days_earned,
            tokens_earned: self.tokens_earned,
        }
    }

    fn restore(&mut self, snapshot: CpaSnapshot) {
        self.campaigns = snapshot.campaigns;
        self.completions = snapshot.completions;
        self.premium_days_earned = snapshot.premium_days_earned;
        self.tokens_earned = snapshot.tokens_earned;
    }
}

/// Store owning the campaign cache and the completion ledger.
pub struct CpaStore {
    inner: Persisted<CpaState>,
}

impl CpaStore {
    pub async fn open(db: Database) -> Self {
        Self {
            inner: Persisted::open(db).await,
        }
    }

    pub fn state(&self) -> &CpaState {
        self.inner.state()
    }

    pub fn campaign(&self, campaign_id: &str) -> Option<&CpaCampaign> {
        self.inner
            .state()
            .campaigns
            .iter()
            .find(|campaign| campaign.id == campaign_id)
    }

    pub fn completion(&self, completion_id: &str) -> Option<&CpaCompletion> {
        self.inner
            .state()
            .completions
            .iter()
            .find(|completion| completion.id == completion_id)
    }

    /// Wholesale campaign-cache refresh; clears the error advisory.
    pub async fn set_campaigns(&mut self, campaigns: Vec<CpaCampaign>) {
        self.inner
            .mutate(|s| {
                s.campaigns = campaigns;
                s.error = None;
            })
            .await;
    }

    /// Wholesale ledger refresh from an external source.
    pub async fn set_completions(&mut self, completions: Vec<CpaCompletion>) {
        self.inner.mutate(|s| s.completions = completions).await;
    }

    /// Append one completion to the ledger. Duplicate submission policy
    /// lives with the caller; the ledger itself keeps history.
    pub async fn add_completion(&mut self, completion: CpaCompletion) {
        self.inner.mutate(|s| s.completions.push(completion)).await;
    }

    /// Merge a patch into the matching completion by id; no-op when the id
    /// is unknown. Per-field state-machine violations are dropped.
    pub async fn update_completion(&mut self, completion_id: &str, patch: CompletionPatch) {
        if self.completion(completion_id).is_none() {
            debug!(completion_id, "completion update skipped, unknown id");
            return;
        }
        self.inner
            .mutate(|s| {
                let Some(completion) = s
                    .completions
                    .iter_mut()
                    .find(|completion| completion.id == completion_id)
                else {
                    return;
                };
                if let Some(status) = patch.status {
                    // pending -> completed | rejected, exactly once.
                    if completion.status == CompletionStatus::Pending
                        && status != CompletionStatus::Pending
                    {
                        completion.status = status;
                    }
                }
                if let Some(completed_at) = patch.completed_at {
                    completion.completed_at = Some(completed_at);
                }
                if let Some(verification_data) = patch.verification_data {
                    completion.verification_data = Some(verification_data);
                }
                if patch.reward_claimed == Some(true)
                    && completion.status == CompletionStatus::Completed
                {
                    completion.reward_claimed = true;
                }
            })
            .await;
    }

    /// Campaigns passing the effectively-active predicate, evaluated
    /// against wall-clock time on every call.
    pub fn active_campaigns(&self) -> Vec<CpaCampaign> {
        self.active_campaigns_at(Utc::now())
    }

    /// [`active_campaigns`](Self::active_campaigns) against an explicit
    /// instant.
    pub fn active_campaigns_at(&self, now: DateTime<Utc>) -> Vec<CpaCampaign> {
        self.inner
            .state()
            .campaigns
            .iter()
            .filter(|campaign| campaign.is_effectively_active_at(now))
            .cloned()
            .collect()
    }

    pub fn user_completions(&self, user_id: i64) -> Vec<CpaCompletion> {
        self.inner
            .state()
            .completions
            .iter()
            .filter(|completion| completion.user_id == user_id)
            .cloned()
            .collect()
    }

    /// True iff any completion matches (campaign, user) with status
    /// `completed`. Pending and rejected attempts do not count.
    pub fn is_campaign_completed(&self, campaign_id: &str, user_id: i64) -> bool {
        self.inner.state().completions.iter().any(|completion| {
            completion.campaign_id == campaign_id
                && completion.user_id == user_id
                && completion.status == CompletionStatus::Completed
        })
    }

    /// Fold claimable completions into reward totals. Completions whose
    /// campaign is missing from the current cache are skipped; their
    /// rewards stay unreachable until the campaign reappears.
    pub fn pending_rewards(&self, user_id: i64) -> PendingRewards {
        let state = self.inner.state();
        let mut rewards = PendingRewards::default();
        for completion in state
            .completions
            .iter()
            .filter(|completion| completion.user_id == user_id && completion.is_claimable())
        {
            let Some(campaign) = state
                .campaigns
                .iter()
                .find(|campaign| campaign.id == completion.campaign_id)
            else {
                continue;
            };
            rewards.campaigns += 1;
            match campaign.reward_type {
                RewardType::PremiumDays => rewards.premium_days += campaign.reward_amount,
                RewardType::Tokens => rewards.tokens += campaign.reward_amount,
            }
        }
        rewards
    }

    /// Flip `reward_claimed` on the matching completion iff it is
    /// completed and unclaimed; no-op otherwise, double-claims included.
    /// Applying the reward itself is the caller's responsibility.
    pub async fn mark_reward_claimed(&mut self, completion_id: &str) {
        let claimable = self
            .completion(completion_id)
            .is_some_and(CpaCompletion::is_claimable);
        if !claimable {
            debug!(completion_id, "claim skipped, completion not claimable");
            return;
        }
        self.inner
            .mutate(|s| {
                if let Some(completion) = s
                    .completions
                    .iter_mut()
                    .find(|completion| completion.id == completion_id)
                {
                    completion.reward_claimed = true;
                }
            })
            .await;
    }

    /// Add a claimed reward to the lifetime accumulators.
    pub async fn record_reward_earned(&mut self, reward_type: RewardType, amount: u32) {
        self.inner
            .mutate(|s| match reward_type {
                RewardType::PremiumDays => s.premium_days_earned += amount,
                RewardType::Tokens => s.tokens_earned += amount,
            })
            .await;
    }

    /// Reset campaigns, ledger, and accumulators.
    pub async fn clear(&mut self) {
        self.inner.mutate(|s| *s = CpaState::default()).await;
    }

    pub async fn set_loading(&mut self, loading: bool) {
        self.inner.mutate(|s| s.loading = loading).await;
    }

    pub async fn set_error(&mut self, error: Option<String>) {
        self.inner.mutate(|s| s.error = error).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiver_core::types::CampaignAction;

    async fn store() -> CpaStore {
        CpaStore::open(Database::open_in_memory().await.unwrap()).await
    }

    fn campaign(id: &str, reward_type: RewardType, amount: u32) -> CpaCampaign {
        CpaCampaign {
            id: id.to_string(),
            title: format!("{id} offer"),
            description: "complete the action".to_string(),
            reward_type,
            reward_amount: amount,
            action_type: CampaignAction::AppInstall,
            app_url: None,
            tracking_url: "https://track.example/offer".to_string(),
            requirements: vec!["install the app".to_string()],
            is_active: true,
            expires_at: None,
            max_completions: None,
            current_completions: 0,
            created_at: Utc::now(),
        }
    }

    fn completion(
        id: &str,
        campaign_id: &str,
        user_id: i64,
        status: CompletionStatus,
    ) -> CpaCompletion {
        CpaCompletion {
            id: id.to_string(),
            user_id,
            campaign_id: campaign_id.to_string(),
            status,
            reward_claimed: false,
            completed_at: None,
            verification_data: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn active_listing_excludes_capped_expired_and_inactive() {
        let mut store = store().await;
        let now = Utc::now();

        let mut capped = campaign("capped", RewardType::PremiumDays, 7);
        capped.max_completions = Some(10);
        capped.current_completions = 10;

        let mut expired = campaign("expired", RewardType::PremiumDays, 7);
        expired.expires_at = Some(now - Duration::hours(1));

        let mut flagged_off = campaign("off", RewardType::PremiumDays, 7);
        flagged_off.is_active = false;

        let mut under_cap = campaign("open", RewardType::PremiumDays, 7);
        under_cap.max_completions = Some(10);
        under_cap.current_completions = 9;

        store
            .set_campaigns(vec![capped, expired, flagged_off, under_cap])
            .await;

        let active = store.active_campaigns_at(now);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "open");
    }

    #[tokio::test]
    async fn pending_rewards_fold_then_zero_after_claim() {
        let mut store = store().await;
        store
            .set_campaigns(vec![campaign("c1", RewardType::PremiumDays, 7)])
            .await;
        store
            .add_completion(completion("x1", "c1", 42, CompletionStatus::Completed))
            .await;

        assert_eq!(
            store.pending_rewards(42),
            PendingRewards {
                campaigns: 1,
                premium_days: 7,
                tokens: 0
            }
        );

        store.mark_reward_claimed("x1").await;
        assert_eq!(store.pending_rewards(42), PendingRewards::default());
    }

    #[tokio::test]
    async fn pending_rewards_sum_across_reward_types() {
        let mut store = store().await;
        store
            .set_campaigns(vec![
                campaign("days", RewardType::PremiumDays, 7),
                campaign("tokens", RewardType::Tokens, 100),
            ])
            .await;
        store
            .add_completion(completion("x1", "days", 42, CompletionStatus::Completed))
            .await;
        store
            .add_completion(completion("x2", "tokens", 42, CompletionStatus::Completed))
            .await;
        // Other users and non-completed attempts never count.
        store
            .add_completion(completion("x3", "days", 7, CompletionStatus::Completed))
            .await;
        store
            .add_completion(completion("x4", "tokens", 42, CompletionStatus::Pending))
            .await;

        assert_eq!(
            store.pending_rewards(42),
            PendingRewards {
                campaigns: 2,
                premium_days: 7,
                tokens: 100
            }
        );
    }

    #[tokio::test]
    async fn rewards_for_evicted_campaigns_are_skipped() {
        let mut store = store().await;
        store
            .add_completion(completion("x1", "gone", 42, CompletionStatus::Completed))
            .await;

        assert_eq!(store.pending_rewards(42), PendingRewards::default());

        // The reward becomes reachable again when the campaign reappears.
        store
            .set_campaigns(vec![campaign("gone", RewardType::Tokens, 50)])
            .await;
        assert_eq!(store.pending_rewards(42).tokens, 50);
    }

    #[tokio::test]
    async fn completion_status_transitions_exactly_once() {
        let mut store = store().await;
        store
            .add_completion(completion("x1", "c1", 42, CompletionStatus::Pending))
            .await;

        let completed_at = Utc::now();
        store
            .update_completion(
                "x1",
                CompletionPatch {
                    status: Some(CompletionStatus::Completed),
                    completed_at: Some(completed_at),
                    ..CompletionPatch::default()
                },
            )
            .await;
        let entry = store.completion("x1").unwrap();
        assert_eq!(entry.status, CompletionStatus::Completed);
        assert_eq!(entry.completed_at, Some(completed_at));

        // A settled completion never flips again.
        store
            .update_completion(
                "x1",
                CompletionPatch {
                    status: Some(CompletionStatus::Rejected),
                    ..CompletionPatch::default()
                },
            )
            .await;
        assert_eq!(
            store.completion("x1").unwrap().status,
            CompletionStatus::Completed
        );
    }

    #[tokio::test]
    async fn claim_requires_completed_status() {
        let mut store = store().await;
        store
            .add_completion(completion("x1", "c1", 42, CompletionStatus::Pending))
            .await;

        store.mark_reward_claimed("x1").await;
        assert!(!store.completion("x1").unwrap().reward_claimed);

        // A patch cannot smuggle the claim in either.
        store
            .update_completion(
                "x1",
                CompletionPatch {
                    reward_claimed: Some(true),
                    ..CompletionPatch::default()
                },
            )
            .await;
        assert!(!store.completion("x1").unwrap().reward_claimed);
    }

    #[tokio::test]
    async fn updating_unknown_completion_is_a_noop() {
        let mut store = store().await;
        store
            .update_completion(
                "missing",
                CompletionPatch {
                    status: Some(CompletionStatus::Completed),
                    ..CompletionPatch::default()
                },
            )
            .await;
        assert!(store.state().completions.is_empty());
    }

    #[tokio::test]
    async fn completed_check_ignores_pending_and_rejected_attempts() {
        let mut store = store().await;
        store
            .add_completion(completion("x1", "c1", 42, CompletionStatus::Pending))
            .await;
        store
            .add_completion(completion("x2", "c1", 42, CompletionStatus::Rejected))
            .await;
        assert!(!store.is_campaign_completed("c1", 42));

        store
            .add_completion(completion("x3", "c1", 42, CompletionStatus::Completed))
            .await;
        assert!(store.is_campaign_completed("c1", 42));
        assert!(!store.is_campaign_completed("c1", 7));
        assert_eq!(store.user_completions(42).len(), 3);
    }

    #[tokio::test]
    async fn campaign_refresh_clears_error_but_ledger_refresh_does_not() {
        let mut store = store().await;
        store.set_error(Some("directory unreachable".to_string())).await;
        store.set_completions(vec![]).await;
        assert_eq!(store.state().error.as_deref(), Some("directory unreachable"));

        store.set_campaigns(vec![]).await;
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn snapshot_keeps_ledger_and_accumulators() {
        let db = Database::open_in_memory().await.unwrap();
        let mut store = CpaStore::open(db.clone()).await;
        store
            .set_campaigns(vec![campaign("c1", RewardType::PremiumDays, 7)])
            .await;
        store
            .add_completion(completion("x1", "c1", 42, CompletionStatus::Completed))
            .await;
        store.record_reward_earned(RewardType::PremiumDays, 7).await;
        store.record_reward_earned(RewardType::Tokens, 100).await;
        store.set_loading(true).await;

        let reopened = CpaStore::open(db).await;
        assert_eq!(reopened.state().campaigns.len(), 1);
        assert_eq!(reopened.state().completions.len(), 1);
        assert_eq!(reopened.state().premium_days_earned, 7);
        assert_eq!(reopened.state().tokens_earned, 100);
        assert!(!reopened.state().loading);
    }
}
