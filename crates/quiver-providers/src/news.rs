// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP news-feed adapter.
//!
//! [`HttpNewsFeed`] reads a CryptoPanic-style posts endpoint and serves a
//! built-in article set when no key is configured or the upstream fails.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use tracing::{debug, warn};

use quiver_config::NewsConfig;
use quiver_core::error::QuiverError;
use quiver_core::types::{CurrencyTag, Fetched, NewsArticle, NewsPage, NewsSource, NewsVotes};
use quiver_core::NewsFeed;

/// HTTP client for a CryptoPanic-compatible news API.
#[derive(Debug, Clone)]
pub struct HttpNewsFeed {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpNewsFeed {
    /// Creates a news client from configuration. An absent key puts the
    /// client in fallback-only mode; no requests are sent.
    pub fn new(config: &NewsConfig) -> Result<Self, QuiverError> {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("Quiver/1.0"));

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
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch_posts(
        &self,
        key: &str,
        currencies: &[String],
        page: u32,
    ) -> Result<NewsPage, QuiverError> {
        let mut url = format!(
            "{}/posts/?auth_token={key}&kind=news&page={page}",
            self.base_url
        );
        if !currencies.is_empty() {
            url.push_str(&format!(
                "&currencies={}",
                currencies.join(",").to_uppercase()
            ));
        }

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuiverError::Provider {
                message: format!("news request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuiverError::Provider {
                message: format!("news request returned {status}: {body}"),
                source: None,
            });
        }

        let body = response
            .json::<PostsBody>()
            .await
            .map_err(|e| QuiverError::Provider {
                message: format!("malformed news body: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(NewsPage {
            has_next: body.next.is_some(),
            articles: body.results.into_iter().map(PostRow::into_domain).collect(),
        })
    }
}

#[async_trait]
impl NewsFeed for HttpNewsFeed {
    async fn latest(
        &self,
        currencies: &[String],
        page: u32,
    ) -> Result<Fetched<NewsPage>, QuiverError> {
        let Some(key) = self.api_key.clone() else {
            debug!(page, "no news key, serving sample articles");
            return Ok(Fetched::fallback(sample_page(currencies, Utc::now())));
        };
        match self.fetch_posts(&key, currencies, page).await {
            Ok(news) => {
                debug!(page, count = news.articles.len(), "news page fetched");
                Ok(Fetched::live(news))
            }
            Err(err) => {
                warn!(error = %err, page, "news fetch failed, serving sample articles");
                Ok(Fetched::fallback(sample_page(currencies, Utc::now())))
            }
        }
    }
}

/// Upstream posts body.
#[derive(Debug, Deserialize)]
struct PostsBody {
    #[serde(default)]
    results: Vec<PostRow>,
    #[serde(default)]
    next: Option<String>,
}

/// One upstream post; ids arrive numeric and are stringified on the way in.
#[derive(Debug, Deserialize)]
struct PostRow {
    id: u64,
    title: String,
    url: String,
    source: NewsSource,
    published_at: DateTime<Utc>,
    #[serde(default)]
    slug: String,
    #[serde(default)]
    currencies: Vec<CurrencyTag>,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    votes: NewsVotes,
}

impl PostRow {
    fn into_domain(self) -> NewsArticle {
        NewsArticle {
            id: self.id.to_string(),
            title: self.title,
            url: self.url,
            source: self.source,
            published_at: self.published_at,
            slug: self.slug,
            currencies: self.currencies,
            kind: self.kind,
            votes: self.votes,
        }
    }
}

fn article(
    now: DateTime<Utc>,
    id: &str,
    title: &str,
    source_title: &str,
    domain: &str,
    slug: &str,
    hours_ago: i64,
    codes: &[(&str, &str)],
) -> NewsArticle {
    NewsArticle {
        id: id.to_string(),
        title: title.to_string(),
        url: format!("https://{domain}/news/{slug}"),
        source: NewsSource {
            title: source_title.to_string(),
            domain: domain.to_string(),
        },
        published_at: now - chrono::Duration::hours(hours_ago),
        slug: slug.to_string(),
        currencies: codes
            .iter()
            .map(|(code, name)| CurrencyTag {
                code: (*code).to_string(),
                title: (*name).to_string(),
            })
            .collect(),
        kind: "news".to_string(),
        votes: NewsVotes::default(),
    }
}

/// The built-in article set served when no live upstream is available.
fn sample_articles(now: DateTime<Utc>) -> Vec<NewsArticle> {
    vec![
        article(
            now,
            "1",
            "Bitcoin Price Surges as Institutional Adoption Grows",
            "CoinDesk",
            "coindesk.com",
            "bitcoin-price-surges-as-institutional-adoption-grows",
            2,
            &[("BTC", "Bitcoin")],
        ),
        article(
            now,
            "2",
            "Ethereum Network Upgrade Shows Promising Results",
            "Decrypt",
            "decrypt.co",
            "ethereum-network-upgrade-shows-promising-results",
            4,
            &[("ETH", "Ethereum")],
        ),
        article(
            now,
            "3",
            "Solana DeFi Ecosystem Reaches New Milestone",
            "The Block",
            "theblock.co",
            "solana-defi-ecosystem-reaches-new-milestone",
            6,
            &[("SOL", "Solana")],
        ),
        article(
            now,
            "4",
            "Crypto Market Analysis: Bulls vs Bears",
            "CoinTelegraph",
            "cointelegraph.com",
            "crypto-market-analysis-bulls-vs-bears",
            8,
            &[("BTC", "Bitcoin"), ("ETH", "Ethereum")],
        ),
        article(
            now,
            "5",
            "New DeFi Protocol Launches with Innovative Features",
            "DeFi Pulse",
            "defipulse.com",
            "new-defi-protocol-launches-with-innovative-features",
            12,
            &[("ETH", "Ethereum"), ("USDC", "USD Coin")],
        ),
    ]
}

/// Sample page narrowed the same way the live endpoint would narrow it.
fn sample_page(currencies: &[String], now: DateTime<Utc>) -> NewsPage {
    let wanted: Vec<String> = currencies.iter().map(|code| code.to_uppercase()).collect();
    let articles = sample_articles(now)
        .into_iter()
        .filter(|article| {
            wanted.is_empty()
                || article
                    .currencies
                    .iter()
                    .any(|tag| wanted.iter().any(|code| code == &tag.code))
        })
        .collect();
    NewsPage {
        articles,
        has_next: false,
    }
}
