// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Orchestration service for the Quiver state core.
//!
//! [`AppService`] owns the four domain stores and coordinates them with
//! the external collaborators: market data, news, the payment processor,
//! the CPA directory, the signal feed, and the host bridge. It is the only
//! place multi-store writes are sequenced; stores never call each other.
//!
//! Each flow guards its preconditions with typed errors and awaits at most
//! one external call per store mutation, so a store never observes half of
//! a flow. Cross-store effects surface as [`DomainEvent`] values consumed
//! here and returned to the caller as a record of what happened.

pub mod events;
pub mod snapshot;

use std::sync::Arc;

use chrono::{Duration, Utc};
use quiver_config::QuiverConfig;
use quiver_core::error::QuiverError;
use quiver_core::types::{
    CampaignQuery, Checkout, CompletionPatch, CompletionStatus, CpaCompletion, HapticPulse,
    ImpactStyle, NotifyKind, PaymentDetails, PaymentMethod, PendingRewards, RewardType,
    SignalQuery, Subscription, SubscriptionPlan, SubscriptionStatus,
};
use quiver_core::{HostBridge, MarketData, NewsFeed, OfferDirectory, PaymentGateway, SignalFeed};
use quiver_store::{CoinsStore, CpaStore, Database, SignalsStore, UserStore};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub use events::{CheckoutProgress, DomainEvent};
pub use snapshot::{SessionSnapshot, SignalsOverview};

/// Price-history window fetched when a coin is selected.
const CHART_DAYS: u32 = 7;

/// Coordinates the domain stores and their external collaborators.
///
/// One instance per running app. Plain store reads and single-store
/// mutations go through the accessor pairs; every flow that touches more
/// than one store or any collaborator lives here.
pub struct AppService {
    user_store: UserStore,
    cpa_store: CpaStore,
    coins_store: CoinsStore,
    signals_store: SignalsStore,
    market: Arc<dyn MarketData>,
    news: Arc<dyn NewsFeed>,
    payments: Arc<dyn PaymentGateway>,
    offers: Arc<dyn OfferDirectory>,
    signal_feed: Arc<dyn SignalFeed>,
    host: Arc<dyn HostBridge>,
    config: QuiverConfig,
    /// Checkout held between `begin_checkout` and a settling poll.
    checkout: Option<Checkout>,
}

impl AppService {
    /// Opens the four stores over the shared database handle and wires in
    /// the collaborators.
    #[allow(clippy::too_many_arguments)]
    pub async fn new(
        db: Database,
        market: Arc<dyn MarketData>,
        news: Arc<dyn NewsFeed>,
        payments: Arc<dyn PaymentGateway>,
        offers: Arc<dyn OfferDirectory>,
        signal_feed: Arc<dyn SignalFeed>,
        host: Arc<dyn HostBridge>,
        config: QuiverConfig,
    ) -> Self {
        let user_store = UserStore::open(db.clone()).await;
        let cpa_store = CpaStore::open(db.clone()).await;
        let coins_store = CoinsStore::open(db.clone()).await;
        let signals_store = SignalsStore::open(db).await;

        info!(app = config.app.name.as_str(), "orchestration service ready");

        Self {
            user_store,
            cpa_store,
            coins_store,
            signals_store,
            market,
            news,
            payments,
            offers,
            signal_feed,
            host,
            config,
            checkout: None,
        }
    }

    /// Read access to the user store; the `_mut` variant is for direct
    /// store operations (watchlist edits, view configuration) that need no
    /// orchestration.
    pub fn user_store(&self) -> &UserStore {
        &self.user_store
    }

    pub fn user_store_mut(&mut self) -> &mut UserStore {
        &mut self.user_store
    }

    pub fn cpa_store(&self) -> &CpaStore {
        &self.cpa_store
    }

    pub fn cpa_store_mut(&mut self) -> &mut CpaStore {
        &mut self.cpa_store
    }

    pub fn coins_store(&self) -> &CoinsStore {
        &self.coins_store
    }

    pub fn coins_store_mut(&mut self) -> &mut CoinsStore {
        &mut self.coins_store
    }

    pub fn signals_store(&self) -> &SignalsStore {
        &self.signals_store
    }

    pub fn signals_store_mut(&mut self) -> &mut SignalsStore {
        &mut self.signals_store
    }

    /// The held checkout, if a purchase is in flight.
    pub fn checkout(&self) -> Option<&Checkout> {
        self.checkout.as_ref()
    }

    /// Pulls the host identity and initializes the local user from it.
    /// Returns the session's user id, or `None` when the host supplies no
    /// identity. Safe to call repeatedly; an existing user is kept.
    pub async fn start_session(&mut self) -> Option<i64> {
        let Some(identity) = self.host.identity().await else {
            debug!("host supplied no identity, session not started");
            return None;
        };
        self.user_store.initialize_user(&identity).await;
        self.user_store.user().map(|user| user.id)
    }

    fn session_user_id(&self) -> Result<i64, QuiverError> {
        self.user_store
            .user()
            .map(|user| user.id)
            .ok_or(QuiverError::NoSession)
    }

    /// Refreshes one page of the coin list. A provider failure keeps the
    /// prior cache and surfaces through the store's error advisory.
    pub async fn refresh_coins(&mut self, page: u32) {
        self.coins_store.set_loading(true).await;
        match self.market.coins(page).await {
            Ok(coins) => {
                debug!(
                    count = coins.data.len(),
                    using_fallback = coins.using_fallback,
                    "coin cache refreshed"
                );
                self.coins_store.set_coins(coins).await;
            }
            Err(e) => {
                warn!(error = %e, "coin refresh failed, keeping prior cache");
                self.coins_store.set_error(Some(e.to_string())).await;
            }
        }
        self.coins_store.set_loading(false).await;
    }

    /// Refreshes the news cache, narrowed to the selected coin's symbol
    /// when one is selected and its symbol is known from the coin cache.
    pub async fn refresh_news(&mut self) {
        let currencies: Vec<String> = self
            .coins_store
            .state()
            .selected_coin_id
            .as_ref()
            .and_then(|id| self.coins_store.coins().iter().find(|coin| coin.id == *id))
            .map(|coin| vec![coin.symbol.to_uppercase()])
            .unwrap_or_default();

        self.coins_store.set_loading(true).await;
        match self.news.latest(&currencies, 1).await {
            Ok(page) => {
                debug!(
                    count = page.data.articles.len(),
                    using_fallback = page.using_fallback,
                    "news cache refreshed"
                );
                self.coins_store.set_coin_news(page.data.articles).await;
                self.coins_store.set_error(None).await;
            }
            Err(e) => {
                warn!(error = %e, "news refresh failed, keeping prior cache");
                self.coins_store.set_error(Some(e.to_string())).await;
            }
        }
        self.coins_store.set_loading(false).await;
    }

    /// Refreshes the signal cache up to the configured feed limit.
    pub async fn refresh_signals(&mut self) {
        self.signals_store.set_loading(true).await;
        let query = SignalQuery {
            limit: Some(self.config.signals.limit),
            ..SignalQuery::default()
        };
        match self.signal_feed.signals(query).await {
            Ok(signals) => {
                debug!(count = signals.len(), "signal cache refreshed");
                self.signals_store.set_signals(signals).await;
            }
            Err(e) => {
                warn!(error = %e, "signal refresh failed, keeping prior cache");
                self.signals_store.set_error(Some(e.to_string())).await;
            }
        }
        self.signals_store.set_loading(false).await;
    }

    /// Refreshes the campaign catalog with the directory's active offers.
    /// The completion ledger is untouched.
    pub async fn refresh_campaigns(&mut self) {
        self.cpa_store.set_loading(true).await;
        let query = CampaignQuery {
            active_only: true,
            ..CampaignQuery::default()
        };
        match self.offers.campaigns(query).await {
            Ok(campaigns) => {
                debug!(count = campaigns.len(), "campaign catalog refreshed");
                self.cpa_store.set_campaigns(campaigns).await;
            }
            Err(e) => {
                warn!(error = %e, "campaign refresh failed, keeping prior catalog");
                self.cpa_store.set_error(Some(e.to_string())).await;
            }
        }
        self.cpa_store.set_loading(false).await;
    }

    /// Records the selection and populates the detail and chart caches.
    /// The previous coin's news/chart/indicator caches are dropped by the
    /// store the moment the selection changes.
    pub async fn select_coin(&mut self, coin_id: &str) {
        self.coins_store
            .set_selected_coin(Some(coin_id.to_string()))
            .await;

        self.coins_store.set_loading(true).await;
        match self.market.coin_detail(coin_id).await {
            Ok(detail) => self.coins_store.set_coin_detail(Some(detail.data)).await,
            Err(e) => {
                warn!(coin_id, error = %e, "coin detail fetch failed");
                self.coins_store.set_error(Some(e.to_string())).await;
            }
        }
        match self.market.market_chart(coin_id, CHART_DAYS).await {
            Ok(chart) => self.coins_store.set_chart_data(Some(chart.data)).await,
            Err(e) => {
                warn!(coin_id, error = %e, "chart fetch failed");
                self.coins_store.set_error(Some(e.to_string())).await;
            }
        }
        self.coins_store.set_loading(false).await;
    }

    /// Opens a checkout for the given plan and settlement rail and holds it
    /// for polling. Opening another checkout replaces an unsettled one.
    pub async fn begin_checkout(
        &mut self,
        plan: SubscriptionPlan,
        method: PaymentMethod,
    ) -> Result<Checkout, QuiverError> {
        let user_id = self.session_user_id()?;
        self.host
            .haptic(HapticPulse::Impact(ImpactStyle::Medium))
            .await;

        let checkout = self.payments.create_checkout(user_id, plan, method).await?;
        info!(
            user_id,
            plan = %plan,
            payment_id = checkout.payment.id.as_str(),
            "checkout opened"
        );
        self.checkout = Some(checkout.clone());
        Ok(checkout)
    }

    /// Polls the held checkout once and applies the outcome. A settled
    /// payment activates the subscription for the plan's full duration
    /// starting now; a terminal failure drops the checkout so a fresh
    /// `begin_checkout` can start over; anything else stays pending.
    pub async fn poll_checkout(&mut self) -> Result<CheckoutProgress, QuiverError> {
        let payment_id = match &self.checkout {
            Some(checkout) => checkout.payment.id.clone(),
            None => return Err(QuiverError::NoCheckout),
        };
        let status = self.payments.payment_status(&payment_id).await?;

        if status.is_settled() {
            let Some(checkout) = self.checkout.take() else {
                return Err(QuiverError::NoCheckout);
            };
            let now = Utc::now();
            let plan = checkout.subscription.plan;
            let subscription = Subscription {
                status: SubscriptionStatus::Active,
                starts_at: now,
                expires_at: now + Duration::days(plan.duration_days()),
                payment_details: Some(PaymentDetails {
                    payment_id: checkout.payment.id.clone(),
                    transaction_hash: None,
                    address: Some(checkout.payment.payment_address.clone()),
                }),
                ..checkout.subscription
            };
            let subscription_id = subscription.id.clone();
            self.user_store.set_subscription(Some(subscription)).await;
            self.host
                .haptic(HapticPulse::Notification(NotifyKind::Success))
                .await;
            info!(
                subscription_id = subscription_id.as_str(),
                %status,
                "subscription activated"
            );
            return Ok(CheckoutProgress::Activated(
                DomainEvent::SubscriptionActivated {
                    subscription_id,
                    plan,
                },
            ));
        }

        if status.is_terminal_failure() {
            self.checkout = None;
            warn!(payment_id = payment_id.as_str(), %status, "checkout failed, cleared for retry");
            return Ok(CheckoutProgress::Failed(status));
        }

        debug!(payment_id = payment_id.as_str(), %status, "payment not settled yet");
        Ok(CheckoutProgress::Pending(status))
    }

    /// Starts a campaign for the session user: submits a completion attempt
    /// to the directory and appends the returned pending entry to the
    /// ledger. Refuses campaigns that are unknown to the catalog, no longer
    /// effectively active, or already completed by this user.
    pub async fn start_campaign(
        &mut self,
        campaign_id: &str,
    ) -> Result<CpaCompletion, QuiverError> {
        let user_id = self.session_user_id()?;

        let Some(campaign) = self.cpa_store.campaign(campaign_id) else {
            return Err(QuiverError::CampaignNotFound {
                campaign_id: campaign_id.to_string(),
            });
        };
        if !campaign.is_effectively_active_at(Utc::now()) {
            return Err(QuiverError::CampaignUnavailable {
                campaign_id: campaign_id.to_string(),
            });
        }
        if self.cpa_store.is_campaign_completed(campaign_id, user_id) {
            return Err(QuiverError::CampaignAlreadyCompleted {
                campaign_id: campaign_id.to_string(),
            });
        }

        self.host
            .haptic(HapticPulse::Impact(ImpactStyle::Medium))
            .await;
        let verification = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "client": self.config.app.name,
        });
        let completion = self
            .offers
            .submit_completion(campaign_id, user_id, verification)
            .await?;
        info!(
            user_id,
            campaign_id,
            completion_id = completion.id.as_str(),
            "campaign started"
        );
        self.cpa_store.add_completion(completion.clone()).await;
        self.host
            .haptic(HapticPulse::Notification(NotifyKind::Success))
            .await;
        Ok(completion)
    }

    /// Polls the directory for a completion's verification outcome and
    /// merges any status change into the ledger.
    pub async fn poll_campaign(
        &mut self,
        completion_id: &str,
    ) -> Result<CompletionStatus, QuiverError> {
        let fresh = self.offers.completion_status(completion_id).await?;
        debug!(completion_id, status = %fresh.status, "completion polled");
        let patch = CompletionPatch {
            status: Some(fresh.status),
            completed_at: fresh.completed_at,
            ..CompletionPatch::default()
        };
        self.cpa_store.update_completion(completion_id, patch).await;
        Ok(fresh.status)
    }

    /// Claimable reward totals for the session user; zero without a
    /// session.
    pub fn pending_rewards(&self) -> PendingRewards {
        self.user_store
            .user()
            .map(|user| self.cpa_store.pending_rewards(user.id))
            .unwrap_or_default()
    }

    /// Claims every claimable completion: flips the ledger flags, adds the
    /// amounts to the lifetime accumulators, and applies the summed premium
    /// days to the subscription. Returns the emitted events, empty when
    /// nothing was claimable.
    pub async fn claim_rewards(&mut self) -> Result<Vec<DomainEvent>, QuiverError> {
        let user_id = self.session_user_id()?;

        let mut events = Vec::new();
        for completion in self.cpa_store.user_completions(user_id) {
            if !completion.is_claimable() {
                continue;
            }
            // A claimable completion whose campaign fell out of the catalog
            // stays parked until the campaign reappears.
            let Some(campaign) = self.cpa_store.campaign(&completion.campaign_id) else {
                debug!(
                    completion_id = completion.id.as_str(),
                    "claim skipped, campaign not in catalog"
                );
                continue;
            };
            let reward_type = campaign.reward_type;
            let amount = campaign.reward_amount;

            self.cpa_store.mark_reward_claimed(&completion.id).await;
            self.cpa_store.record_reward_earned(reward_type, amount).await;
            info!(
                user_id,
                campaign_id = completion.campaign_id.as_str(),
                %reward_type,
                amount,
                "reward claimed"
            );
            events.push(DomainEvent::RewardClaimed {
                completion_id: completion.id.clone(),
                campaign_id: completion.campaign_id.clone(),
                reward_type,
                amount,
            });
        }

        let premium_days: i64 = events
            .iter()
            .map(|event| match event {
                DomainEvent::RewardClaimed {
                    reward_type: RewardType::PremiumDays,
                    amount,
                    ..
                } => i64::from(*amount),
                _ => 0,
            })
            .sum();
        if premium_days > 0 {
            self.apply_premium_days(user_id, premium_days).await;
            self.host
                .haptic(HapticPulse::Notification(NotifyKind::Success))
                .await;
        }

        Ok(events)
    }

    /// Extends a live subscription by the granted days, or grants a fresh
    /// reward subscription when none is live.
    async fn apply_premium_days(&mut self, user_id: i64, days: i64) {
        let now = Utc::now();
        let subscription = match self.user_store.subscription() {
            Some(current) if current.is_live_at(now) => {
                let mut extended = current.clone();
                extended.expires_at += Duration::days(days);
                extended
            }
            _ => Subscription {
                id: format!("sub_reward_{}", Uuid::new_v4()),
                user_id,
                plan: SubscriptionPlan::Monthly,
                status: SubscriptionStatus::Active,
                payment_method: PaymentMethod::Usdt,
                amount: 0.0,
                currency: "USD".to_string(),
                starts_at: now,
                expires_at: now + Duration::days(days),
                created_at: now,
                payment_details: None,
            },
        };
        info!(
            user_id,
            days,
            expires_at = %subscription.expires_at,
            "premium days applied"
        );
        self.user_store.set_subscription(Some(subscription)).await;
    }

    /// One coherent view across all four stores, read synchronously at a
    /// single instant.
    pub fn session_snapshot(&self) -> SessionSnapshot {
        let now = Utc::now();
        let user_id = self.user_store.user().map(|user| user.id);
        let completed_campaigns = user_id
            .map(|id| {
                self.cpa_store
                    .user_completions(id)
                    .iter()
                    .filter(|completion| completion.status == CompletionStatus::Completed)
                    .count()
            })
            .unwrap_or(0);
        let cpa_state = self.cpa_store.state();

        SessionSnapshot {
            user_id,
            is_subscribed: self.user_store.is_subscribed_at(now),
            premium_access: self.user_store.premium_access_at(now),
            watchlist_coins: self.user_store.watchlist().len(),
            pending_rewards: user_id
                .map(|id| self.cpa_store.pending_rewards(id))
                .unwrap_or_default(),
            completed_campaigns,
            premium_days_earned: cpa_state.premium_days_earned,
            tokens_earned: cpa_state.tokens_earned,
        }
    }

    /// Premium gate over the signal cache: subscribers get the filtered
    /// listing, everyone else a teaser carrying only the cache size.
    pub fn signals_overview(&self) -> SignalsOverview {
        let now = Utc::now();
        if self.user_store.premium_access_at(now).signals {
            SignalsOverview::Unlocked(self.signals_store.filtered_signals_at(now))
        } else {
            SignalsOverview::Locked {
                total: self.signals_store.signals().len(),
            }
        }
    }

    /// Exports the account as a JSON document. Requires the `export`
    /// capability.
    pub async fn export_account(&self) -> Result<serde_json::Value, QuiverError> {
        self.host
            .haptic(HapticPulse::Impact(ImpactStyle::Light))
            .await;
        if !self.user_store.premium_access().export {
            return Err(QuiverError::PremiumRequired { feature: "export" });
        }
        let state = self.user_store.state();
        Ok(serde_json::json!({
            "user": state.user,
            "subscription": state.subscription,
            "watchlist": state.watchlist,
            "exported_at": Utc::now().to_rfc3339(),
        }))
    }

    /// Asks the host for confirmation and, on yes, clears the user store
    /// and drops any held checkout. Returns whether the logout happened.
    pub async fn logout(&mut self) -> Result<bool, QuiverError> {
        self.host
            .haptic(HapticPulse::Impact(ImpactStyle::Medium))
            .await;
        let confirmed = self.host.confirm("Are you sure you want to logout?").await?;
        if !confirmed {
            debug!("logout cancelled");
            return Ok(false);
        }
        self.user_store.clear().await;
        self.checkout = None;
        info!("user logged out");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use quiver_core::types::{
        CampaignAction, ChartData, Coin, CoinDetail, CpaCampaign, Fetched, PaymentStatus,
    };
    use quiver_providers::{
        HttpMarketData, HttpNewsFeed, MockHostBridge, MockOfferDirectory, MockPaymentGateway,
        MockSignalFeed,
    };

    async fn service() -> AppService {
        service_with(
            MockHostBridge::new(),
            MockPaymentGateway::new(),
            MockOfferDirectory::new(),
        )
        .await
    }

    async fn service_with(
        host: MockHostBridge,
        payments: MockPaymentGateway,
        offers: MockOfferDirectory,
    ) -> AppService {
        let db = Database::open_in_memory().await.unwrap();
        service_over(db, Arc::new(host), Arc::new(payments), Arc::new(offers)).await
    }

    async fn service_over(
        db: Database,
        host: Arc<dyn HostBridge>,
        payments: Arc<dyn PaymentGateway>,
        offers: Arc<dyn OfferDirectory>,
    ) -> AppService {
        let config = QuiverConfig::default();
        AppService::new(
            db,
            Arc::new(HttpMarketData::new(&config.market).unwrap()),
            Arc::new(HttpNewsFeed::new(&config.news).unwrap()),
            payments,
            offers,
            Arc::new(MockSignalFeed::new()),
            host,
            config,
        )
        .await
    }

    /// Runs one campaign through start, directory approval, and poll.
    async fn complete_campaign(
        svc: &mut AppService,
        offers: &MockOfferDirectory,
        campaign_id: &str,
    ) -> String {
        svc.refresh_campaigns().await;
        let completion = svc.start_campaign(campaign_id).await.unwrap();
        offers.script_outcome(CompletionStatus::Completed).await;
        let status = svc.poll_campaign(&completion.id).await.unwrap();
        assert_eq!(status, CompletionStatus::Completed);
        completion.id
    }

    fn capped_campaign(id: &str) -> CpaCampaign {
        CpaCampaign {
            id: id.to_string(),
            title: "Legacy Promo".to_string(),
            description: "Promo that already hit its completion cap".to_string(),
            reward_type: RewardType::Tokens,
            reward_amount: 50,
            action_type: CampaignAction::Registration,
            app_url: None,
            tracking_url: "https://partner.example.com/legacy".to_string(),
            requirements: vec!["Register an account".to_string()],
            is_active: true,
            expires_at: None,
            max_completions: Some(10),
            current_completions: 10,
            created_at: Utc::now(),
        }
    }

    struct FailingMarket;

    #[async_trait]
    impl MarketData for FailingMarket {
        async fn coins(&self, _page: u32) -> Result<Fetched<Vec<Coin>>, QuiverError> {
            Err(QuiverError::Provider {
                message: "market upstream down".to_string(),
                source: None,
            })
        }

        async fn coin_detail(&self, _coin_id: &str) -> Result<Fetched<CoinDetail>, QuiverError> {
            Err(QuiverError::Provider {
                message: "market upstream down".to_string(),
                source: None,
            })
        }

        async fn market_chart(
            &self,
            _coin_id: &str,
            _days: u32,
        ) -> Result<Fetched<ChartData>, QuiverError> {
            Err(QuiverError::Provider {
                message: "market upstream down".to_string(),
                source: None,
            })
        }
    }

    #[tokio::test]
    async fn session_starts_from_the_host_identity() {
        let mut svc = service().await;

        let user_id = svc.start_session().await.unwrap();
        let user = svc.user_store().user().unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.first_name, "Dev");

        // Starting again keeps the existing user.
        assert_eq!(svc.start_session().await, Some(user_id));
    }

    #[tokio::test]
    async fn flows_refuse_to_run_without_a_session() {
        let mut svc = service_with(
            MockHostBridge::without_identity(),
            MockPaymentGateway::new(),
            MockOfferDirectory::new(),
        )
        .await;

        assert!(svc.start_session().await.is_none());
        assert!(matches!(
            svc.begin_checkout(SubscriptionPlan::Monthly, PaymentMethod::Usdt)
                .await,
            Err(QuiverError::NoSession)
        ));
        assert!(matches!(
            svc.start_campaign("cpa_1").await,
            Err(QuiverError::NoSession)
        ));
        assert!(matches!(
            svc.claim_rewards().await,
            Err(QuiverError::NoSession)
        ));
        assert_eq!(svc.pending_rewards(), PendingRewards::default());
    }

    #[tokio::test]
    async fn coin_refresh_fills_the_cache_and_flags_fallback() {
        let mut svc = service().await;

        svc.refresh_coins(1).await;

        let state = svc.coins_store().state();
        assert_eq!(state.coins.len(), 3);
        assert_eq!(state.coins[0].id, "bitcoin");
        assert!(state.using_fallback);
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn refresh_failure_keeps_the_prior_cache_and_sets_the_error() {
        let config = QuiverConfig::default();
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = AppService::new(
            db,
            Arc::new(FailingMarket),
            Arc::new(HttpNewsFeed::new(&config.news).unwrap()),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(MockOfferDirectory::new()),
            Arc::new(MockSignalFeed::new()),
            Arc::new(MockHostBridge::new()),
            config,
        )
        .await;

        // Seed the cache with the built-in samples from an offline adapter.
        let offline = HttpMarketData::new(&QuiverConfig::default().market).unwrap();
        let seeded = offline.coins(1).await.unwrap();
        svc.coins_store_mut().set_coins(seeded).await;

        svc.refresh_coins(1).await;

        let state = svc.coins_store().state();
        assert_eq!(state.coins.len(), 3);
        assert!(state.error.as_deref().unwrap().contains("market upstream down"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn selecting_a_coin_caches_detail_and_chart() {
        let mut svc = service().await;

        svc.select_coin("ethereum").await;

        let state = svc.coins_store().state();
        assert_eq!(state.selected_coin_id.as_deref(), Some("ethereum"));
        assert_eq!(state.coin_detail.as_ref().unwrap().id, "ethereum");
        let chart = state.chart_data.as_ref().unwrap();
        assert_eq!(chart.prices.len(), CHART_DAYS as usize + 1);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn news_refresh_follows_the_selected_coin() {
        let mut svc = service().await;

        // No selection: the full sample feed lands in the cache.
        svc.refresh_news().await;
        assert_eq!(svc.coins_store().state().coin_news.len(), 5);

        svc.refresh_coins(1).await;
        svc.select_coin("bitcoin").await;
        assert!(svc.coins_store().state().coin_news.is_empty());

        svc.refresh_news().await;
        let news = &svc.coins_store().state().coin_news;
        assert!(!news.is_empty());
        assert!(news
            .iter()
            .all(|article| article.currencies.iter().any(|tag| tag.code == "BTC")));
    }

    #[tokio::test]
    async fn signal_refresh_honors_the_configured_limit() {
        let mut config = QuiverConfig::default();
        config.signals.limit = 2;
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = AppService::new(
            db,
            Arc::new(HttpMarketData::new(&config.market).unwrap()),
            Arc::new(HttpNewsFeed::new(&config.news).unwrap()),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(MockOfferDirectory::new()),
            Arc::new(MockSignalFeed::new()),
            Arc::new(MockHostBridge::new()),
            config,
        )
        .await;

        svc.refresh_signals().await;
        assert_eq!(svc.signals_store().signals().len(), 2);
        assert_eq!(svc.signals_store().signals()[0].id, "signal_1");
    }

    #[tokio::test]
    async fn checkout_settles_into_an_active_subscription() {
        let host = Arc::new(MockHostBridge::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            host.clone(),
            Arc::new(MockPaymentGateway::with_statuses(vec![
                PaymentStatus::Confirming,
                PaymentStatus::Finished,
            ])),
            Arc::new(MockOfferDirectory::new()),
        )
        .await;
        svc.start_session().await.unwrap();

        let checkout = svc
            .begin_checkout(SubscriptionPlan::Monthly, PaymentMethod::Usdt)
            .await
            .unwrap();
        assert_eq!(checkout.payment.amount, 9.99);
        assert!(svc.checkout().is_some());

        assert_eq!(
            svc.poll_checkout().await.unwrap(),
            CheckoutProgress::Pending(PaymentStatus::Confirming)
        );

        let progress = svc.poll_checkout().await.unwrap();
        match progress {
            CheckoutProgress::Activated(DomainEvent::SubscriptionActivated {
                subscription_id,
                plan,
            }) => {
                assert_eq!(subscription_id, checkout.subscription.id);
                assert_eq!(plan, SubscriptionPlan::Monthly);
            }
            other => panic!("expected activation, got {other:?}"),
        }

        assert!(svc.checkout().is_none());
        assert!(svc.user_store().is_subscribed());
        assert!(svc.user_store().premium_access().signals);
        let subscription = svc.user_store().subscription().unwrap();
        assert_eq!(subscription.status, SubscriptionStatus::Active);
        assert_eq!(
            subscription.payment_details.as_ref().unwrap().payment_id,
            checkout.payment.id
        );

        let pulses = host.haptics().await;
        assert!(pulses.contains(&HapticPulse::Impact(ImpactStyle::Medium)));
        assert!(pulses.contains(&HapticPulse::Notification(NotifyKind::Success)));
    }

    #[tokio::test]
    async fn terminal_payment_failure_clears_the_checkout() {
        let mut svc = service_with(
            MockHostBridge::new(),
            MockPaymentGateway::with_statuses(vec![PaymentStatus::Expired]),
            MockOfferDirectory::new(),
        )
        .await;
        svc.start_session().await.unwrap();

        assert!(matches!(
            svc.poll_checkout().await,
            Err(QuiverError::NoCheckout)
        ));

        svc.begin_checkout(SubscriptionPlan::Yearly, PaymentMethod::Btc)
            .await
            .unwrap();
        assert_eq!(
            svc.poll_checkout().await.unwrap(),
            CheckoutProgress::Failed(PaymentStatus::Expired)
        );

        assert!(svc.checkout().is_none());
        assert!(!svc.user_store().is_subscribed());

        // A fresh purchase can start over.
        svc.begin_checkout(SubscriptionPlan::Monthly, PaymentMethod::Usdt)
            .await
            .unwrap();
        assert!(svc.checkout().is_some());
    }

    #[tokio::test]
    async fn campaign_lifecycle_from_start_to_claimed_reward() {
        let offers = Arc::new(MockOfferDirectory::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            Arc::new(MockHostBridge::new()),
            Arc::new(MockPaymentGateway::new()),
            offers.clone(),
        )
        .await;
        let user_id = svc.start_session().await.unwrap();

        svc.refresh_campaigns().await;
        assert_eq!(svc.cpa_store().state().campaigns.len(), 5);

        let completion = svc.start_campaign("cpa_1").await.unwrap();
        assert_eq!(completion.status, CompletionStatus::Pending);

        // Nothing scripted yet: the directory still reports pending.
        assert_eq!(
            svc.poll_campaign(&completion.id).await.unwrap(),
            CompletionStatus::Pending
        );

        offers.script_outcome(CompletionStatus::Completed).await;
        assert_eq!(
            svc.poll_campaign(&completion.id).await.unwrap(),
            CompletionStatus::Completed
        );
        let ledger = svc.cpa_store().completion(&completion.id).unwrap();
        assert_eq!(ledger.status, CompletionStatus::Completed);
        assert!(ledger.completed_at.is_some());

        let rewards = svc.pending_rewards();
        assert_eq!(rewards.campaigns, 1);
        assert_eq!(rewards.premium_days, 7);

        let events = svc.claim_rewards().await.unwrap();
        assert_eq!(
            events,
            vec![DomainEvent::RewardClaimed {
                completion_id: completion.id.clone(),
                campaign_id: "cpa_1".to_string(),
                reward_type: RewardType::PremiumDays,
                amount: 7,
            }]
        );

        let subscription = svc.user_store().subscription().unwrap();
        assert!(subscription.id.starts_with("sub_reward_"));
        assert_eq!(subscription.amount, 0.0);
        assert_eq!(
            (subscription.expires_at - subscription.starts_at).num_days(),
            7
        );
        assert!(svc.user_store().is_subscribed());
        assert_eq!(svc.pending_rewards(), PendingRewards::default());
        assert_eq!(svc.cpa_store().state().premium_days_earned, 7);

        // Claims are consumed; a second pass emits nothing.
        assert!(svc.claim_rewards().await.unwrap().is_empty());

        // The completed campaign cannot be started again.
        assert!(matches!(
            svc.start_campaign("cpa_1").await,
            Err(QuiverError::CampaignAlreadyCompleted { .. })
        ));

        let snapshot = svc.session_snapshot();
        assert_eq!(snapshot.user_id, Some(user_id));
        assert_eq!(snapshot.completed_campaigns, 1);
        assert_eq!(snapshot.premium_days_earned, 7);
    }

    #[tokio::test]
    async fn claiming_extends_a_live_subscription() {
        let offers = Arc::new(MockOfferDirectory::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            Arc::new(MockHostBridge::new()),
            Arc::new(MockPaymentGateway::with_statuses(vec![
                PaymentStatus::Finished,
            ])),
            offers.clone(),
        )
        .await;
        svc.start_session().await.unwrap();

        svc.begin_checkout(SubscriptionPlan::Monthly, PaymentMethod::Usdt)
            .await
            .unwrap();
        svc.poll_checkout().await.unwrap();
        let before = svc.user_store().subscription().unwrap().clone();

        // MetaMask campaign pays 3 premium days.
        complete_campaign(&mut svc, &offers, "cpa_2").await;
        let events = svc.claim_rewards().await.unwrap();
        assert_eq!(events.len(), 1);

        let after = svc.user_store().subscription().unwrap();
        assert_eq!(after.id, before.id);
        assert_eq!(after.expires_at, before.expires_at + Duration::days(3));
    }

    #[tokio::test]
    async fn campaign_guards_reject_unknown_and_unavailable() {
        let mut svc = service().await;
        svc.start_session().await.unwrap();
        svc.cpa_store_mut()
            .set_campaigns(vec![capped_campaign("cpa_cap")])
            .await;

        assert!(matches!(
            svc.start_campaign("missing").await,
            Err(QuiverError::CampaignNotFound { .. })
        ));
        assert!(matches!(
            svc.start_campaign("cpa_cap").await,
            Err(QuiverError::CampaignUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn logout_respects_the_confirm_answer() {
        let host = Arc::new(MockHostBridge::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            host.clone(),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(MockOfferDirectory::new()),
        )
        .await;
        svc.start_session().await.unwrap();

        host.script_confirm(false).await;
        assert!(!svc.logout().await.unwrap());
        assert!(svc.user_store().user().is_some());

        host.script_confirm(true).await;
        assert!(svc.logout().await.unwrap());
        assert!(svc.user_store().user().is_none());
        assert!(svc.user_store().watchlist().is_empty());
    }

    #[tokio::test]
    async fn signals_overview_gates_on_premium() {
        let offers = Arc::new(MockOfferDirectory::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            Arc::new(MockHostBridge::new()),
            Arc::new(MockPaymentGateway::new()),
            offers.clone(),
        )
        .await;
        svc.start_session().await.unwrap();
        svc.refresh_signals().await;

        assert_eq!(svc.signals_overview(), SignalsOverview::Locked { total: 5 });

        // Earn premium days through a campaign to unlock the listing.
        complete_campaign(&mut svc, &offers, "cpa_1").await;
        svc.claim_rewards().await.unwrap();

        match svc.signals_overview() {
            SignalsOverview::Unlocked(signals) => {
                assert_eq!(signals.len(), 5);
                assert_eq!(signals[0].id, "signal_1");
            }
            other => panic!("expected unlocked signals, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn export_requires_the_premium_capability() {
        let offers = Arc::new(MockOfferDirectory::new());
        let db = Database::open_in_memory().await.unwrap();
        let mut svc = service_over(
            db,
            Arc::new(MockHostBridge::new()),
            Arc::new(MockPaymentGateway::new()),
            offers.clone(),
        )
        .await;
        svc.start_session().await.unwrap();
        svc.user_store_mut()
            .add_to_watchlist("bitcoin", "btc", "Bitcoin")
            .await;

        assert!(matches!(
            svc.export_account().await,
            Err(QuiverError::PremiumRequired { feature: "export" })
        ));

        complete_campaign(&mut svc, &offers, "cpa_1").await;
        svc.claim_rewards().await.unwrap();

        let doc = svc.export_account().await.unwrap();
        assert_eq!(doc["user"]["first_name"], "Dev");
        assert_eq!(doc["watchlist"].as_array().unwrap().len(), 1);
        assert!(doc["subscription"]["id"]
            .as_str()
            .unwrap()
            .starts_with("sub_reward_"));
        assert!(doc["exported_at"].is_string());
    }

    #[tokio::test]
    async fn session_snapshot_reads_every_store_at_once() {
        let mut svc = service().await;

        let empty = svc.session_snapshot();
        assert_eq!(empty.user_id, None);
        assert!(!empty.is_subscribed);
        assert!(!empty.premium_access.export);
        assert_eq!(empty.watchlist_coins, 0);
        assert_eq!(empty.pending_rewards, PendingRewards::default());

        let user_id = svc.start_session().await.unwrap();
        svc.user_store_mut()
            .add_to_watchlist("bitcoin", "btc", "Bitcoin")
            .await;

        let snapshot = svc.session_snapshot();
        assert_eq!(snapshot.user_id, Some(user_id));
        assert_eq!(snapshot.watchlist_coins, 1);
        assert_eq!(snapshot.completed_campaigns, 0);
    }

    #[tokio::test]
    async fn service_state_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiver.db");
        let path = path.to_str().unwrap();

        let user_id = {
            let db = Database::open(path).await.unwrap();
            let mut svc = service_over(
                db,
                Arc::new(MockHostBridge::new()),
                Arc::new(MockPaymentGateway::new()),
                Arc::new(MockOfferDirectory::new()),
            )
            .await;
            let user_id = svc.start_session().await.unwrap();
            svc.user_store_mut()
                .add_to_watchlist("solana", "sol", "Solana")
                .await;
            user_id
        };

        let db = Database::open(path).await.unwrap();
        let svc = service_over(
            db,
            Arc::new(MockHostBridge::new()),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(MockOfferDirectory::new()),
        )
        .await;

        assert_eq!(svc.user_store().user().unwrap().id, user_id);
        assert_eq!(svc.user_store().watchlist().len(), 1);
        assert_eq!(svc.user_store().watchlist()[0].coin_id, "solana");
    }
}
