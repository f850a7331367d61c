// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP market-data adapter.
//!
//! Provides [`HttpMarketData`], a CoinGecko-style client behind the
//! [`MarketData`] trait. Every operation degrades to built-in sample data
//! when no live API key is configured or the upstream call fails; the
//! [`Fetched::using_fallback`] flag tells the stores which kind they got.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use quiver_config::MarketConfig;
use quiver_core::error::QuiverError;
use quiver_core::types::{
    ChartData, Coin, CoinDetail, CoinImage, CoinLinks, CoinMarketData, Fetched,
};
use quiver_core::MarketData;

/// HTTP client for a CoinGecko-compatible market-data API.
#[derive(Debug, Clone)]
pub struct HttpMarketData {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    page_size: u32,
}

impl HttpMarketData {
    /// Creates a market-data client from configuration. An absent or demo
    /// API key puts the client in fallback-only mode; no requests are sent.
    pub fn new(config: &MarketConfig) -> Result<Self, QuiverError> {
        let api_key = config.live_api_key().map(str::to_string);

        let mut headers = HeaderMap::new();
        if let Some(key) = &api_key {
            headers.insert(
                "x-cg-demo-api-key",
                HeaderValue::from_str(key).map_err(|e| {
                    QuiverError::Config(format!("invalid market API key header value: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QuiverError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key,
            page_size: config.page_size,
        })
    }

    async fn fetch_coins(&self, page: u32) -> Result<Vec<Coin>, QuiverError> {
        let url = format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_desc&per_page={}&page={}&sparkline=false&price_change_percentage=24h",
            self.base_url, self.page_size, page
        );
        let response = self.send(&url, "market list").await?;
        response
            .json::<Vec<Coin>>()
            .await
            .map_err(|e| QuiverError::Provider {
                message: format!("malformed market list body: {e}"),
                source: Some(Box::new(e)),
            })
    }

    async fn fetch_coin_detail(&self, coin_id: &str) -> Result<CoinDetail, QuiverError> {
        let url = format!(
            "{}/coins/{coin_id}?localization=false&tickers=false&market_data=true&community_data=true&developer_data=true&sparkline=false",
            self.base_url
        );
        let response = self.send(&url, "coin detail").await?;
        let detail =
            response
                .json::<GeckoCoinDetail>()
                .await
                .map_err(|e| QuiverError::Provider {
                    message: format!("malformed coin detail body: {e}"),
                    source: Some(Box::new(e)),
                })?;
        Ok(detail.into_domain())
    }

    async fn fetch_market_chart(&self, coin_id: &str, days: u32) -> Result<ChartData, QuiverError> {
        let url = format!(
            "{}/coins/{coin_id}/market_chart?vs_currency=usd&days={days}",
            self.base_url
        );
        let response = self.send(&url, "market chart").await?;
        let chart = response
            .json::<GeckoChart>()
            .await
            .map_err(|e| QuiverError::Provider {
                message: format!("malformed market chart body: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(chart.into_domain())
    }

    async fn send(&self, url: &str, what: &str) -> Result<reqwest::Response, QuiverError> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| QuiverError::Provider {
                    message: format!("{what} request failed: {e}"),
                    source: Some(Box::new(e)),
                })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuiverError::Provider {
                message: format!("{what} request returned {status}: {body}"),
                source: None,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl MarketData for HttpMarketData {
    async fn coins(&self, page: u32) -> Result<Fetched<Vec<Coin>>, QuiverError> {
        if self.api_key.is_none() {
            debug!(page, "no live market key, serving sample coin list");
            return Ok(Fetched::fallback(sample_coins(Utc::now())));
        }
        match self.fetch_coins(page).await {
            Ok(coins) => {
                debug!(page, count = coins.len(), "market list fetched");
                Ok(Fetched::live(coins))
            }
            Err(err) => {
                warn!(error = %err, page, "market list fetch failed, serving sample data");
                Ok(Fetched::fallback(sample_coins(Utc::now())))
            }
        }
    }

    async fn coin_detail(&self, coin_id: &str) -> Result<Fetched<CoinDetail>, QuiverError> {
        if self.api_key.is_none() {
            debug!(coin_id, "no live market key, serving sample coin detail");
            return Ok(Fetched::fallback(sample_coin_detail(coin_id, Utc::now())));
        }
        match self.fetch_coin_detail(coin_id).await {
            Ok(detail) => Ok(Fetched::live(detail)),
            Err(err) => {
                warn!(error = %err, coin_id, "coin detail fetch failed, serving sample data");
                Ok(Fetched::fallback(sample_coin_detail(coin_id, Utc::now())))
            }
        }
    }

    async fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Fetched<ChartData>, QuiverError> {
        if self.api_key.is_none() {
            debug!(coin_id, days, "no live market key, serving sample chart");
            return Ok(Fetched::fallback(sample_chart(coin_id, days, Utc::now())));
        }
        match self.fetch_market_chart(coin_id, days).await {
            Ok(chart) => Ok(Fetched::live(chart)),
            Err(err) => {
                warn!(error = %err, coin_id, days, "market chart fetch failed, serving sample data");
                Ok(Fetched::fallback(sample_chart(coin_id, days, Utc::now())))
            }
        }
    }
}

/// Upstream coin-detail body. Monetary figures arrive keyed by quote
/// currency and are flattened to their USD entry on the way in.
#[derive(Debug, Deserialize)]
struct GeckoCoinDetail {
    id: String,
    symbol: String,
    name: String,
    image: CoinImage,
    #[serde(default)]
    description: GeckoDescription,
    #[serde(default)]
    links: GeckoLinks,
    market_data: GeckoMarketData,
}

#[derive(Debug, Default, Deserialize)]
struct GeckoDescription {
    #[serde(default)]
    en: String,
}

#[derive(Debug, Default, Deserialize)]
struct GeckoLinks {
    #[serde(default)]
    homepage: Vec<String>,
    #[serde(default)]
    twitter_screen_name: Option<String>,
    #[serde(default)]
    subreddit_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UsdQuote {
    #[serde(default)]
    usd: f64,
}

#[derive(Debug, Deserialize)]
struct UsdDate {
    usd: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct GeckoMarketData {
    current_price: UsdQuote,
    market_cap: UsdQuote,
    #[serde(default)]
    market_cap_rank: Option<u32>,
    #[serde(default)]
    fully_diluted_valuation: Option<UsdQuote>,
    total_volume: UsdQuote,
    high_24h: UsdQuote,
    low_24h: UsdQuote,
    price_change_percentage_24h: f64,
    #[serde(default)]
    price_change_percentage_7d: f64,
    #[serde(default)]
    price_change_percentage_30d: f64,
    #[serde(default)]
    price_change_percentage_1y: f64,
    ath: UsdQuote,
    ath_change_percentage: UsdQuote,
    ath_date: UsdDate,
    atl: UsdQuote,
    atl_change_percentage: UsdQuote,
    atl_date: UsdDate,
    circulating_supply: f64,
    #[serde(default)]
    total_supply: Option<f64>,
    #[serde(default)]
    max_supply: Option<f64>,
    last_updated: DateTime<Utc>,
}

impl GeckoCoinDetail {
    fn into_domain(self) -> CoinDetail {
        let market = self.market_data;
        CoinDetail {
            id: self.id,
            symbol: self.symbol,
            name: self.name,
            image: self.image,
            description: self.description.en,
            links: CoinLinks {
                homepage: self
                    .links
                    .homepage
                    .into_iter()
                    .filter(|url| !url.is_empty())
                    .collect(),
                twitter_screen_name: self.links.twitter_screen_name,
                subreddit_url: self.links.subreddit_url,
            },
            market_data: CoinMarketData {
                current_price: market.current_price.usd,
                market_cap: market.market_cap.usd,
                market_cap_rank: market.market_cap_rank,
                fully_diluted_valuation: market.fully_diluted_valuation.map(|quote| quote.usd),
                total_volume: market.total_volume.usd,
                high_24h: market.high_24h.usd,
                low_24h: market.low_24h.usd,
                price_change_percentage_24h: market.price_change_percentage_24h,
                price_change_percentage_7d: market.price_change_percentage_7d,
                price_change_percentage_30d: market.price_change_percentage_30d,
                price_change_percentage_1y: market.price_change_percentage_1y,
                ath: market.ath.usd,
                ath_change_percentage: market.ath_change_percentage.usd,
                ath_date: market.ath_date.usd,
                atl: market.atl.usd,
                atl_change_percentage: market.atl_change_percentage.usd,
                atl_date: market.atl_date.usd,
                circulating_supply: market.circulating_supply,
                total_supply: market.total_supply,
                max_supply: market.max_supply,
                last_updated: market.last_updated,
            },
        }
    }
}

/// Upstream chart body; timestamps arrive as millisecond floats.
#[derive(Debug, Deserialize)]
struct GeckoChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
    #[serde(default)]
    market_caps: Vec<(f64, f64)>,
    #[serde(default)]
    total_volumes: Vec<(f64, f64)>,
}

impl GeckoChart {
    fn into_domain(self) -> ChartData {
        fn points(raw: Vec<(f64, f64)>) -> Vec<(i64, f64)> {
            raw.into_iter()
                .map(|(ts, value)| (ts as i64, value))
                .collect()
        }
        ChartData {
            prices: points(self.prices),
            market_caps: points(self.market_caps),
            total_volumes: points(self.total_volumes),
        }
    }
}

fn date(iso: &str, fallback: DateTime<Utc>) -> DateTime<Utc> {
    iso.parse().unwrap_or(fallback)
}

/// The built-in coin list served when no live upstream is available.
fn sample_coins(now: DateTime<Utc>) -> Vec<Coin> {
    vec![
        Coin {
            id: "bitcoin".to_string(),
            symbol: "btc".to_string(),
            name: "Bitcoin".to_string(),
            image: "https://assets.coingecko.com/coins/images/1/large/bitcoin.png".to_string(),
            current_price: 43_250.0,
            market_cap: 845_123_456_789.0,
            market_cap_rank: Some(1),
            fully_diluted_valuation: Some(908_456_789_123.0),
            total_volume: 25_123_456_789.0,
            high_24h: 44_150.0,
            low_24h: 42_890.0,
            price_change_24h: 1_025.50,
            price_change_percentage_24h: 2.43,
            market_cap_change_24h: 18_456_789_123.0,
            market_cap_change_percentage_24h: 2.23,
            circulating_supply: 19_656_250.0,
            total_supply: Some(21_000_000.0),
            max_supply: Some(21_000_000.0),
            ath: 69_045.0,
            ath_change_percentage: -37.42,
            ath_date: date("2021-11-10T14:24:11.849Z", now),
            atl: 67.81,
            atl_change_percentage: 63_671.89,
            atl_date: date("2013-07-06T00:00:00.000Z", now),
            last_updated: now,
        },
        Coin {
            id: "ethereum".to_string(),
            symbol: "eth".to_string(),
            name: "Ethereum".to_string(),
            image: "https://assets.coingecko.com/coins/images/279/large/ethereum.png".to_string(),
            current_price: 2_650.0,
            market_cap: 318_456_789_123.0,
            market_cap_rank: Some(2),
            fully_diluted_valuation: Some(318_456_789_123.0),
            total_volume: 15_789_456_123.0,
            high_24h: 2_715.0,
            low_24h: 2_620.0,
            price_change_24h: 45.50,
            price_change_percentage_24h: 1.75,
            market_cap_change_24h: 5_456_789_123.0,
            market_cap_change_percentage_24h: 1.74,
            circulating_supply: 120_280_000.0,
            total_supply: Some(120_280_000.0),
            max_supply: None,
            ath: 4_878.26,
            ath_change_percentage: -45.65,
            ath_date: date("2021-11-10T14:24:19.604Z", now),
            atl: 0.432979,
            atl_change_percentage: 612_023.89,
            atl_date: date("2015-10-20T00:00:00.000Z", now),
            last_updated: now,
        },
        Coin {
            id: "solana".to_string(),
            symbol: "sol".to_string(),
            name: "Solana".to_string(),
            image: "https://assets.coingecko.com/coins/images/4128/large/solana.png".to_string(),
            current_price: 98.50,
            market_cap: 43_456_789_123.0,
            market_cap_rank: Some(5),
            fully_diluted_valuation: Some(55_789_456_123.0),
            total_volume: 2_456_789_123.0,
            high_24h: 102.30,
            low_24h: 96.80,
            price_change_24h: -2.15,
            price_change_percentage_24h: -2.14,
            market_cap_change_24h: -956_789_123.0,
            market_cap_change_percentage_24h: -2.15,
            circulating_supply: 441_234_567.0,
            total_supply: Some(566_234_567.0),
            max_supply: None,
            ath: 259.96,
            ath_change_percentage: -62.11,
            ath_date: date("2021-11-06T21:54:35.825Z", now),
            atl: 0.500801,
            atl_change_percentage: 19_565.89,
            atl_date: date("2020-05-11T19:35:23.449Z", now),
            last_updated: now,
        },
    ]
}

/// The built-in detail snapshot: the requested id with a capitalized
/// display name over the Bitcoin sample figures.
fn sample_coin_detail(coin_id: &str, now: DateTime<Utc>) -> CoinDetail {
    CoinDetail {
        id: coin_id.to_string(),
        symbol: "btc".to_string(),
        name: capitalize(coin_id),
        image: CoinImage {
            thumb: "https://assets.coingecko.com/coins/images/1/thumb/bitcoin.png".to_string(),
            small: "https://assets.coingecko.com/coins/images/1/small/bitcoin.png".to_string(),
            large: "https://assets.coingecko.com/coins/images/1/large/bitcoin.png".to_string(),
        },
        description: "Bitcoin is the first successful internet money based on peer-to-peer \
                      technology; whereby no central bank or authority is involved in the \
                      transaction and production of the Bitcoin currency. It was created by an \
                      anonymous individual/group under the name, Satoshi Nakamoto. The source \
                      code is available publicly as an open source project, anybody can look at \
                      it and be part of the developmental process."
            .to_string(),
        links: CoinLinks {
            homepage: vec!["https://bitcoin.org/".to_string()],
            twitter_screen_name: Some("bitcoin".to_string()),
            subreddit_url: Some("https://www.reddit.com/r/Bitcoin/".to_string()),
        },
        market_data: CoinMarketData {
            current_price: 43_250.0,
            market_cap: 845_123_456_789.0,
            market_cap_rank: Some(1),
            fully_diluted_valuation: Some(908_456_789_123.0),
            total_volume: 25_123_456_789.0,
            high_24h: 44_150.0,
            low_24h: 42_890.0,
            price_change_percentage_24h: 2.43,
            price_change_percentage_7d: 5.67,
            price_change_percentage_30d: 12.45,
            price_change_percentage_1y: 134.56,
            ath: 69_045.0,
            ath_change_percentage: -37.42,
            ath_date: date("2021-11-10T14:24:11.849Z", now),
            atl: 67.81,
            atl_change_percentage: 63_671.89,
            atl_date: date("2013-07-06T00:00:00.000Z", now),
            circulating_supply: 19_656_250.0,
            total_supply: Some(21_000_000.0),
            max_supply: Some(21_000_000.0),
            last_updated: now,
        },
    }
}

/// A synthetic daily series anchored on the sample list: one point per day
/// plus today, a mild deterministic wave around the anchor price.
fn sample_chart(coin_id: &str, days: u32, now: DateTime<Utc>) -> ChartData {
    let coins = sample_coins(now);
    let (anchor, supply) = coins
        .iter()
        .find(|coin| coin.id == coin_id)
        .map_or((100.0, 1_000_000.0), |coin| {
            (coin.current_price, coin.circulating_supply)
        });

    let days = days.max(1);
    let mut chart = ChartData::default();
    for offset in 0..=days {
        let at = now - chrono::Duration::days(i64::from(days - offset));
        let ts = at.timestamp_millis();
        let wave = 1.0 + 0.02 * (f64::from(offset % 7) - 3.0);
        let price = anchor * wave;
        chart.prices.push((ts, price));
        chart.market_caps.push((ts, price * supply));
        chart.total_volumes.push((ts, price * supply * 0.03));
    }
    chart
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
