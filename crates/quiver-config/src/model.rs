// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Quiver state core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Marker value shipped in development environments in place of a real
/// market-data key; treated the same as no key at all.
const DEMO_KEY: &str = "demo_key_for_development";

/// Top-level Quiver configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QuiverConfig {
    /// Application identity and logging settings.
    #[serde(default)]
    pub app: AppConfig,

    /// Host mini-app container settings.
    #[serde(default)]
    pub host: HostConfig,

    /// Market-data provider settings.
    #[serde(default)]
    pub market: MarketConfig,

    /// News provider settings.
    #[serde(default)]
    pub news: NewsConfig,

    /// Payment gateway settings.
    #[serde(default)]
    pub payments: PaymentsConfig,

    /// Trading-signal feed settings.
    #[serde(default)]
    pub signals: SignalsConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl QuiverConfig {
    /// Which integrations are live, derived from key presence.
    pub fn features(&self) -> FeatureFlags {
        FeatureFlags {
            real_time_data: self.market.live_api_key().is_some(),
            news_feeds: self.news.api_key.is_some(),
            payments: self.payments.api_key.is_some(),
            host_integration: !self.host.bot_name.is_empty(),
        }
    }
}

/// Application identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Display name of the application.
    #[serde(default = "default_app_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public URL the app is served from, used for share/payment links.
    #[serde(default = "default_public_url")]
    pub public_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
            public_url: default_public_url(),
        }
    }
}

fn default_app_name() -> String {
    "quiver".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_public_url() -> String {
    "https://quiver.app".to_string()
}

/// Host mini-app container configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct HostConfig {
    /// Bot name the mini app is attached to. Empty disables host integration.
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
        }
    }
}

fn default_bot_name() -> String {
    "QuiverBot".to_string()
}

/// Market-data provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Market-data API key. `None` (or the demo marker) serves fallback data.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the market-data API.
    #[serde(default = "default_market_base_url")]
    pub base_url: String,

    /// Coins per page on the list endpoint.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl MarketConfig {
    /// The API key, unless it is absent, empty, or the demo marker.
    pub fn live_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != DEMO_KEY)
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_market_base_url(),
            page_size: default_page_size(),
        }
    }
}

fn default_market_base_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_page_size() -> u32 {
    50
}

/// News provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct NewsConfig {
    /// News API key. `None` serves fallback articles.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the news API.
    #[serde(default = "default_news_base_url")]
    pub base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_news_base_url(),
        }
    }
}

fn default_news_base_url() -> String {
    "https://cryptopanic.com/api/v1".to_string()
}

/// Payment gateway configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PaymentsConfig {
    /// Gateway API key. `None` disables the payments feature flag.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Callback URL the gateway notifies on status changes.
    #[serde(default)]
    pub callback_url: Option<String>,
}

/// Trading-signal feed configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignalsConfig {
    /// Maximum signals fetched per refresh.
    #[serde(default = "default_signal_limit")]
    pub limit: usize,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            limit: default_signal_limit(),
        }
    }
}

fn default_signal_limit() -> usize {
    20
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the SQLite database holding store snapshots.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "quiver.db".to_string()
}

/// Derived feature availability, mirroring which external keys are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub real_time_data: bool,
    pub news_feeds: bool,
    pub payments: bool,
    pub host_integration: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_disable_every_live_integration_except_host() {
        let config = QuiverConfig::default();
        let features = config.features();
        assert!(!features.real_time_data);
        assert!(!features.news_feeds);
        assert!(!features.payments);
        assert!(features.host_integration);
    }

    #[test]
    fn demo_market_key_counts_as_absent() {
        let mut config = QuiverConfig::default();
        config.market.api_key = Some(DEMO_KEY.to_string());
        assert!(config.market.live_api_key().is_none());
        assert!(!config.features().real_time_data);

        config.market.api_key = Some("CG-real-key".to_string());
        assert_eq!(config.market.live_api_key(), Some("CG-real-key"));
        assert!(config.features().real_time_data);
    }
}
