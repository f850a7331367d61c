// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock CPA campaign directory.
//!
//! Carries an in-memory catalog and completion ledger. Verification is
//! asynchronous on a real directory; here it is scripted: queued outcomes
//! are applied one per status poll while the completion is still pending,
//! and an empty queue leaves it pending.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use quiver_core::error::QuiverError;
use quiver_core::types::{
    CampaignAction, CampaignQuery, CompletionStatus, CpaCampaign, CpaCompletion, RewardType,
};
use quiver_core::OfferDirectory;

/// A campaign directory double with an in-memory catalog and ledger.
pub struct MockOfferDirectory {
    campaigns: Arc<Mutex<Vec<CpaCampaign>>>,
    completions: Arc<Mutex<Vec<CpaCompletion>>>,
    outcomes: Arc<Mutex<VecDeque<CompletionStatus>>>,
}

impl MockOfferDirectory {
    /// Creates a directory carrying the built-in demo catalog.
    pub fn new() -> Self {
        Self::with_campaigns(sample_campaigns(Utc::now()))
    }

    /// Creates a directory with an explicit catalog.
    pub fn with_campaigns(campaigns: Vec<CpaCampaign>) -> Self {
        Self {
            campaigns: Arc::new(Mutex::new(campaigns)),
            completions: Arc::new(Mutex::new(Vec::new())),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queues the verification outcome applied on the next pending poll.
    pub async fn script_outcome(&self, status: CompletionStatus) {
        self.outcomes.lock().await.push_back(status);
    }
}

impl Default for MockOfferDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OfferDirectory for MockOfferDirectory {
    async fn campaigns(&self, query: CampaignQuery) -> Result<Vec<CpaCampaign>, QuiverError> {
        let now = Utc::now();
        let mut listed: Vec<CpaCampaign> = self
            .campaigns
            .lock()
            .await
            .iter()
            .filter(|campaign| !query.active_only || campaign.is_effectively_active_at(now))
            .filter(|campaign| {
                query
                    .reward_type
                    .is_none_or(|reward| campaign.reward_type == reward)
            })
            .filter(|campaign| {
                query
                    .action_type
                    .is_none_or(|action| campaign.action_type == action)
            })
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(listed)
    }

    async fn submit_completion(
        &self,
        campaign_id: &str,
        user_id: i64,
        verification: serde_json::Value,
    ) -> Result<CpaCompletion, QuiverError> {
        let now = Utc::now();
        let mut campaigns = self.campaigns.lock().await;
        let campaign = campaigns
            .iter_mut()
            .find(|campaign| campaign.id == campaign_id)
            .ok_or_else(|| QuiverError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            })?;
        if !campaign.is_effectively_active_at(now) {
            return Err(QuiverError::CampaignUnavailable {
                campaign_id: campaign_id.to_string(),
            });
        }

        campaign.current_completions += 1;
        let completion = CpaCompletion {
            id: format!("completion_{}", Uuid::new_v4()),
            user_id,
            campaign_id: campaign_id.to_string(),
            status: CompletionStatus::Pending,
            reward_claimed: false,
            completed_at: None,
            verification_data: Some(verification),
            created_at: now,
        };
        self.completions.lock().await.push(completion.clone());
        debug!(
            campaign_id,
            user_id,
            completion_id = %completion.id,
            "mock completion submitted"
        );
        Ok(completion)
    }

    async fn completion_status(&self, completion_id: &str) -> Result<CpaCompletion, QuiverError> {
        let mut completions = self.completions.lock().await;
        let completion = completions
            .iter_mut()
            .find(|completion| completion.id == completion_id)
            .ok_or_else(|| QuiverError::Provider {
                message: format!("unknown completion: {completion_id}"),
                source: None,
            })?;

        if completion.status == CompletionStatus::Pending {
            if let Some(outcome) = self.outcomes.lock().await.pop_front() {
                completion.status = outcome;
                if outcome == CompletionStatus::Completed {
                    completion.completed_at = Some(Utc::now());
                }
                debug!(completion_id, outcome = %outcome, "scripted verification applied");
            }
        }
        Ok(completion.clone())
    }
}

/// The built-in demo catalog.
fn sample_campaigns(now: DateTime<Utc>) -> Vec<CpaCampaign> {
    vec![
        CpaCampaign {
            id: "cpa_1".to_string(),
            title: "Download Binance App".to_string(),
            description: "Download and register on Binance mobile app to earn 7 days of premium \
                          access"
                .to_string(),
            reward_type: RewardType::PremiumDays,
            reward_amount: 7,
            action_type: CampaignAction::AppInstall,
            app_url: Some("https://www.binance.com/en/download".to_string()),
            tracking_url: "https://partner.binance.com/track?ref=quiver".to_string(),
            requirements: vec![
                "Download Binance mobile app".to_string(),
                "Complete registration with valid email".to_string(),
                "Verify your account".to_string(),
                "Complete identity verification (KYC)".to_string(),
            ],
            is_active: true,
            expires_at: Some(now + Duration::days(30)),
            max_completions: Some(1000),
            current_completions: 156,
            created_at: now - Duration::days(10),
        },
        CpaCampaign {
            id: "cpa_2".to_string(),
            title: "Connect MetaMask Wallet".to_string(),
            description: "Connect your MetaMask wallet and make a test transaction to earn \
                          premium access"
                .to_string(),
            reward_type: RewardType::PremiumDays,
            reward_amount: 3,
            action_type: CampaignAction::WalletConnect,
            app_url: None,
            tracking_url: "https://metamask.io/quiver-partner".to_string(),
            requirements: vec![
                "Install MetaMask browser extension".to_string(),
                "Create or import wallet".to_string(),
                "Connect wallet to our platform".to_string(),
                "Complete a test transaction (minimum $10)".to_string(),
            ],
            is_active: true,
            expires_at: Some(now + Duration::days(45)),
            max_completions: Some(500),
            current_completions: 89,
            created_at: now - Duration::days(5),
        },
        CpaCampaign {
            id: "cpa_3".to_string(),
            title: "OKX Exchange Registration".to_string(),
            description: "Sign up for OKX exchange and complete KYC verification".to_string(),
            reward_type: RewardType::PremiumDays,
            reward_amount: 14,
            action_type: CampaignAction::Registration,
            app_url: Some("https://www.okx.com".to_string()),
            tracking_url: "https://www.okx.com/partner/quiver".to_string(),
            requirements: vec![
                "Register new account on OKX".to_string(),
                "Complete email verification".to_string(),
                "Complete phone verification".to_string(),
                "Complete KYC Level 1 verification".to_string(),
                "Make initial deposit (minimum $50)".to_string(),
            ],
            is_active: true,
            expires_at: Some(now + Duration::days(60)),
            max_completions: Some(300),
            current_completions: 45,
            created_at: now - Duration::days(3),
        },
        CpaCampaign {
            id: "cpa_4".to_string(),
            title: "DeFi Yield Farming".to_string(),
            description: "Participate in DeFi yield farming on supported platforms".to_string(),
            reward_type: RewardType::PremiumDays,
            reward_amount: 21,
            action_type: CampaignAction::Deposit,
            app_url: None,
            tracking_url: "https://defi-partner.com/quiver".to_string(),
            requirements: vec![
                "Connect wallet to supported DeFi platform".to_string(),
                "Deposit minimum $100 in liquidity pool".to_string(),
                "Maintain position for at least 7 days".to_string(),
                "Provide transaction hash as proof".to_string(),
            ],
            is_active: true,
            expires_at: Some(now + Duration::days(90)),
            max_completions: Some(200),
            current_completions: 23,
            created_at: now - Duration::days(1),
        },
        CpaCampaign {
            id: "cpa_5".to_string(),
            title: "Crypto.com App Challenge".to_string(),
            description: "Download Crypto.com app and complete the onboarding process".to_string(),
            reward_type: RewardType::PremiumDays,
            reward_amount: 5,
            action_type: CampaignAction::AppInstall,
            app_url: Some("https://crypto.com/app".to_string()),
            tracking_url: "https://crypto.com/partner/quiver".to_string(),
            requirements: vec![
                "Download Crypto.com mobile app".to_string(),
                "Complete registration process".to_string(),
                "Verify email and phone number".to_string(),
                "Complete basic KYC verification".to_string(),
            ],
            is_active: true,
            expires_at: Some(now + Duration::days(21)),
            max_completions: Some(750),
            current_completions: 234,
            created_at: now - Duration::days(7),
        },
    ]
}
