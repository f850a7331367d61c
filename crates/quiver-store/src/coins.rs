// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Market-data cache with the filtered/sorted view the UI renders.
//!
//! The coin cache is session-only and refetched on startup; what persists
//! is the view configuration: search term, filters, sort, and the curated
//! trending/new id sets.

use std::cmp::Ordering;

use quiver_core::types::{
    ChartData, Coin, CoinDetail, CoinFilters, Fetched, NewsArticle, SortDirection, SortField,
    SortOption, TechnicalIndicators,
};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::persist::{Persisted, StoreState};

/// Sort key for coins the ranking endpoint left unranked; sorts after
/// every real rank.
const UNRANKED: f64 = 9999.0;

/// Live state of the coins store.
#[derive(Debug, Default)]
pub struct CoinsState {
    pub coins: Vec<Coin>,
    /// Pass-through flag from the market provider: the current cache came
    /// from built-in samples, not the live API.
    pub using_fallback: bool,
    pub coin_detail: Option<CoinDetail>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_term: String,
    pub filters: CoinFilters,
    pub sort: SortOption,
    pub trending_coins: Vec<String>,
    pub new_coins: Vec<String>,
    pub selected_coin_id: Option<String>,
    pub coin_news: Vec<NewsArticle>,
    pub chart_data: Option<ChartData>,
    pub indicators: Option<TechnicalIndicators>,
}

/// Persisted projection of [`CoinsState`]: view configuration only, never
/// the cached market data.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CoinsSnapshot {
    #[serde(default)]
    pub search_term: String,
    #[serde(default)]
    pub filters: CoinFilters,
    #[serde(default)]
    pub sort: SortOption,
    #[serde(default)]
    pub trending_coins: Vec<String>,
    #[serde(default)]
    pub new_coins: Vec<String>,
}

impl StoreState for CoinsState {
    type Snapshot = CoinsSnapshot;

    const STORE: &'static str = "coins";
    const VERSION: u32 = 1;

    fn capture(&self) -> CoinsSnapshot {
        CoinsSnapshot {
            search_term: self.search_term.clone(),
            filters: self.filters.clone(),
            sort: self.sort,
            trending_coins: self.trending_coins.clone(),
            new_coins: self.new_coins.clone(),
        }
    }

    fn restore(&mut self, snapshot: CoinsSnapshot) {
        self.search_term = snapshot.search_term;
        self.filters = snapshot.filters;
        self.sort = snapshot.sort;
        self.trending_coins = snapshot.trending_coins;
        self.new_coins = snapshot.new_coins;
    }
}

/// Store owning the market-data caches and the view configuration.
pub struct CoinsStore {
    inner: Persisted<CoinsState>,
}

impl CoinsStore {
    pub async fn open(db: Database) -> Self {
        Self {
            inner: Persisted::open(db).await,
        }
    }

    pub fn state(&self) -> &CoinsState {
        self.inner.state()
    }

    pub fn coins(&self) -> &[Coin] {
        &self.inner.state().coins
    }

    /// Wholesale cache refresh; clears the error advisory and records the
    /// provider's fallback flag. View configuration is untouched.
    pub async fn set_coins(&mut self, coins: Fetched<Vec<Coin>>) {
        self.inner
            .mutate(|s| {
                s.coins = coins.data;
                s.using_fallback = coins.using_fallback;
                s.error = None;
            })
            .await;
    }

    pub async fn set_coin_detail(&mut self, detail: Option<CoinDetail>) {
        self.inner.mutate(|s| s.coin_detail = detail).await;
    }

    pub async fn set_search_term(&mut self, term: String) {
        self.inner.mutate(|s| s.search_term = term).await;
    }

    /// Replace the filter configuration wholesale; callers build the new
    /// value from the current one.
    pub async fn set_filters(&mut self, filters: CoinFilters) {
        self.inner.mutate(|s| s.filters = filters).await;
    }

    pub async fn set_sort(&mut self, sort: SortOption) {
        self.inner.mutate(|s| s.sort = sort).await;
    }

    /// Record the selection and drop the per-coin caches so stale news or
    /// chart data from the previous coin never renders under the new one.
    /// The detail cache stands until the next detail fetch replaces it.
    pub async fn set_selected_coin(&mut self, coin_id: Option<String>) {
        self.inner
            .mutate(|s| {
                s.selected_coin_id = coin_id;
                s.coin_news = Vec::new();
                s.chart_data = None;
                s.indicators = None;
            })
            .await;
    }

    pub async fn set_coin_news(&mut self, news: Vec<NewsArticle>) {
        self.inner.mutate(|s| s.coin_news = news).await;
    }

    pub async fn set_chart_data(&mut self, data: Option<ChartData>) {
        self.inner.mutate(|s| s.chart_data = data).await;
    }

    pub async fn set_indicators(&mut self, indicators: Option<TechnicalIndicators>) {
        self.inner.mutate(|s| s.indicators = indicators).await;
    }

    pub async fn set_trending(&mut self, coin_ids: Vec<String>) {
        self.inner.mutate(|s| s.trending_coins = coin_ids).await;
    }

    pub async fn set_new(&mut self, coin_ids: Vec<String>) {
        self.inner.mutate(|s| s.new_coins = coin_ids).await;
    }

    /// The list the UI renders: conjunctive filters over the cache, then a
    /// stable sort by the selected field. The cache itself is never
    /// reordered.
    pub fn filtered_coins(&self) -> Vec<Coin> {
        let state = self.inner.state();
        let search = state.search_term.to_lowercase();
        let mut filtered: Vec<Coin> = state
            .coins
            .iter()
            .filter(|coin| coin_matches(state, coin, &search))
            .cloned()
            .collect();

        let SortOption { field, direction } = state.sort;
        filtered.sort_by(|a, b| {
            let ord = sort_key(a, field)
                .partial_cmp(&sort_key(b, field))
                .unwrap_or(Ordering::Equal);
            match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        filtered
    }

    /// Drop every cache and the search/filter selection. The sort choice
    /// and the curated trending/new id sets survive.
    pub async fn clear(&mut self) {
        self.inner
            .mutate(|s| {
                s.coins = Vec::new();
                s.using_fallback = false;
                s.coin_detail = None;
                s.loading = false;
                s.error = None;
                s.search_term = String::new();
                s.filters = CoinFilters::default();
                s.selected_coin_id = None;
                s.coin_news = Vec::new();
                s.chart_data = None;
                s.indicators = None;
            })
            .await;
    }

    pub async fn set_loading(&mut self, loading: bool) {
        self.inner.mutate(|s| s.loading = loading).await;
    }

    pub async fn set_error(&mut self, error: Option<String>) {
        self.inner.mutate(|s| s.error = error).await;
    }
}

fn coin_matches(state: &CoinsState, coin: &Coin, search: &str) -> bool {
    if !search.is_empty()
        && !coin.name.to_lowercase().contains(search)
        && !coin.symbol.to_lowercase().contains(search)
    {
        return false;
    }
    let f = &state.filters;
    if f.price_min.is_some_and(|min| coin.current_price < min) {
        return false;
    }
    if f.price_max.is_some_and(|max| coin.current_price > max) {
        return false;
    }
    if f.market_cap_min.is_some_and(|min| coin.market_cap < min) {
        return false;
    }
    if f.market_cap_max.is_some_and(|max| coin.market_cap > max) {
        return false;
    }
    if f.volume_min.is_some_and(|min| coin.total_volume < min) {
        return false;
    }
    if f
        .change_24h_min
        .is_some_and(|min| coin.price_change_percentage_24h < min)
    {
        return false;
    }
    if f
        .change_24h_max
        .is_some_and(|max| coin.price_change_percentage_24h > max)
    {
        return false;
    }
    if f.is_trending && !state.trending_coins.iter().any(|id| id == &coin.id) {
        return false;
    }
    if f.is_new && !state.new_coins.iter().any(|id| id == &coin.id) {
        return false;
    }
    true
}

fn sort_key(coin: &Coin, field: SortField) -> f64 {
    match field {
        SortField::MarketCapRank => coin.market_cap_rank.map_or(UNRANKED, f64::from),
        SortField::CurrentPrice => coin.current_price,
        SortField::PriceChangePercentage24h => coin.price_change_percentage_24h,
        SortField::TotalVolume => coin.total_volume,
        SortField::MarketCap => coin.market_cap,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    async fn store() -> CoinsStore {
        CoinsStore::open(Database::open_in_memory().await.unwrap()).await
    }

    fn coin(id: &str, symbol: &str, name: &str, price: f64) -> Coin {
        let now = Utc::now();
        Coin {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            image: format!("https://img.example/{id}.png"),
            current_price: price,
            market_cap: price * 1_000_000.0,
            market_cap_rank: None,
            fully_diluted_valuation: None,
            total_volume: price * 100_000.0,
            high_24h: price * 1.1,
            low_24h: price * 0.9,
            price_change_24h: 0.0,
            price_change_percentage_24h: 0.0,
            market_cap_change_24h: 0.0,
            market_cap_change_percentage_24h: 0.0,
            circulating_supply: 1_000_000.0,
            total_supply: None,
            max_supply: None,
            ath: price * 2.0,
            ath_change_percentage: -50.0,
            ath_date: now,
            atl: price / 2.0,
            atl_change_percentage: 100.0,
            atl_date: now,
            last_updated: now,
        }
    }

    #[tokio::test]
    async fn price_range_keeps_only_coins_inside_the_bounds() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![
                coin("a", "aaa", "Alpha", 10.0),
                coin("b", "bbb", "Beta", 50.0),
                coin("c", "ccc", "Gamma", 100.0),
            ]))
            .await;
        store
            .set_filters(CoinFilters {
                price_min: Some(20.0),
                price_max: Some(80.0),
                ..CoinFilters::default()
            })
            .await;

        let filtered = store.filtered_coins();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].current_price, 50.0);
    }

    #[tokio::test]
    async fn search_matches_name_or_symbol_case_insensitively() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![
                coin("bitcoin", "btc", "Bitcoin", 60_000.0),
                coin("ethereum", "eth", "Ethereum", 3_000.0),
                coin("solana", "sol", "Solana", 150.0),
            ]))
            .await;

        store.set_search_term("BIT".to_string()).await;
        let by_name = store.filtered_coins();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, "bitcoin");

        store.set_search_term("eth".to_string()).await;
        let by_symbol = store.filtered_coins();
        assert_eq!(by_symbol.len(), 1);
        assert_eq!(by_symbol[0].id, "ethereum");
    }

    #[tokio::test]
    async fn trending_and_new_filters_use_the_curated_id_sets() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![
                coin("bitcoin", "btc", "Bitcoin", 60_000.0),
                coin("ethereum", "eth", "Ethereum", 3_000.0),
                coin("pepe", "pepe", "Pepe", 0.01),
            ]))
            .await;
        store.set_trending(vec!["bitcoin".to_string()]).await;
        store.set_new(vec!["pepe".to_string()]).await;

        store
            .set_filters(CoinFilters {
                is_trending: true,
                ..CoinFilters::default()
            })
            .await;
        assert_eq!(store.filtered_coins()[0].id, "bitcoin");
        assert_eq!(store.filtered_coins().len(), 1);

        store
            .set_filters(CoinFilters {
                is_new: true,
                ..CoinFilters::default()
            })
            .await;
        assert_eq!(store.filtered_coins()[0].id, "pepe");

        // Both at once is conjunctive and matches nothing here.
        store
            .set_filters(CoinFilters {
                is_trending: true,
                is_new: true,
                ..CoinFilters::default()
            })
            .await;
        assert!(store.filtered_coins().is_empty());
    }

    #[tokio::test]
    async fn unranked_coins_sort_after_ranked_ones() {
        let mut store = store().await;
        let mut first = coin("a", "aaa", "Alpha", 1.0);
        first.market_cap_rank = Some(2);
        let mut second = coin("b", "bbb", "Beta", 2.0);
        second.market_cap_rank = Some(1);
        let unranked = coin("c", "ccc", "Gamma", 3.0);

        store
            .set_coins(Fetched::live(vec![unranked, first, second]))
            .await;

        let ids: Vec<String> = store.filtered_coins().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[tokio::test]
    async fn descending_sort_reverses_the_field_order() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![
                coin("a", "aaa", "Alpha", 10.0),
                coin("b", "bbb", "Beta", 50.0),
                coin("c", "ccc", "Gamma", 30.0),
            ]))
            .await;
        store
            .set_sort(SortOption {
                field: SortField::CurrentPrice,
                direction: SortDirection::Desc,
            })
            .await;

        let ids: Vec<String> = store.filtered_coins().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[tokio::test]
    async fn equal_sort_keys_keep_cache_order() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![
                coin("first", "aaa", "Alpha", 5.0),
                coin("second", "bbb", "Beta", 5.0),
                coin("third", "ccc", "Gamma", 5.0),
            ]))
            .await;
        store
            .set_sort(SortOption {
                field: SortField::CurrentPrice,
                direction: SortDirection::Desc,
            })
            .await;

        let ids: Vec<String> = store.filtered_coins().into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn cache_refresh_keeps_view_configuration() {
        let mut store = store().await;
        store.set_search_term("sol".to_string()).await;
        store
            .set_sort(SortOption {
                field: SortField::MarketCap,
                direction: SortDirection::Desc,
            })
            .await;
        store.set_error(Some("provider unreachable".to_string())).await;

        store
            .set_coins(Fetched::fallback(vec![coin("solana", "sol", "Solana", 150.0)]))
            .await;

        let state = store.state();
        assert_eq!(state.search_term, "sol");
        assert_eq!(state.sort.field, SortField::MarketCap);
        assert!(state.using_fallback);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn selecting_a_coin_drops_per_coin_caches() {
        let mut store = store().await;
        store
            .set_selected_coin(Some("bitcoin".to_string()))
            .await;
        store
            .set_chart_data(Some(ChartData {
                prices: vec![(1, 60_000.0)],
                ..ChartData::default()
            }))
            .await;
        store
            .set_indicators(Some(TechnicalIndicators {
                rsi: Some(55.0),
                ..TechnicalIndicators::default()
            }))
            .await;

        store.set_selected_coin(Some("ethereum".to_string())).await;
        let state = store.state();
        assert_eq!(state.selected_coin_id.as_deref(), Some("ethereum"));
        assert!(state.coin_news.is_empty());
        assert!(state.chart_data.is_none());
        assert!(state.indicators.is_none());
    }

    #[tokio::test]
    async fn clear_keeps_sort_and_curated_id_sets() {
        let mut store = store().await;
        store
            .set_coins(Fetched::live(vec![coin("bitcoin", "btc", "Bitcoin", 60_000.0)]))
            .await;
        store.set_search_term("bit".to_string()).await;
        store
            .set_sort(SortOption {
                field: SortField::TotalVolume,
                direction: SortDirection::Desc,
            })
            .await;
        store.set_trending(vec!["bitcoin".to_string()]).await;

        store.clear().await;

        let state = store.state();
        assert!(state.coins.is_empty());
        assert!(state.search_term.is_empty());
        assert_eq!(state.filters, CoinFilters::default());
        assert_eq!(state.sort.field, SortField::TotalVolume);
        assert_eq!(state.trending_coins, ["bitcoin"]);
    }

    #[tokio::test]
    async fn snapshot_persists_view_configuration_not_the_cache() {
        let db = Database::open_in_memory().await.unwrap();
        let mut store = CoinsStore::open(db.clone()).await;
        store
            .set_coins(Fetched::live(vec![coin("bitcoin", "btc", "Bitcoin", 60_000.0)]))
            .await;
        store.set_search_term("bit".to_string()).await;
        store
            .set_filters(CoinFilters {
                volume_min: Some(1_000.0),
                ..CoinFilters::default()
            })
            .await;
        store.set_new(vec!["pepe".to_string()]).await;

        let reopened = CoinsStore::open(db).await;
        let state = reopened.state();
        assert!(state.coins.is_empty());
        assert_eq!(state.search_term, "bit");
        assert_eq!(state.filters.volume_min, Some(1_000.0));
        assert_eq!(state.new_coins, ["pepe"]);
    }
}
