// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./quiver.toml` > `~/.config/quiver/quiver.toml` > `/etc/quiver/quiver.toml`
//! with environment variable overrides via `QUIVER_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::QuiverConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/quiver/quiver.toml` (system-wide)
/// 3. `~/.config/quiver/quiver.toml` (user XDG config)
/// 4. `./quiver.toml` (local directory)
/// 5. `QUIVER_*` environment variables
pub fn load_config() -> Result<QuiverConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuiverConfig::default()))
        .merge(Toml::file("/etc/quiver/quiver.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("quiver/quiver.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("quiver.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no file or env lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<QuiverConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuiverConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<QuiverConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(QuiverConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `QUIVER_MARKET_API_KEY` must map to
/// `market.api_key`, not `market.api.key`.
fn env_provider() -> Env {
    Env::prefixed("QUIVER_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: QUIVER_MARKET_API_KEY -> "market_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("app_", "app.", 1)
            .replacen("host_", "host.", 1)
            .replacen("market_", "market.", 1)
            .replacen("news_", "news.", 1)
            .replacen("payments_", "payments.", 1)
            .replacen("signals_", "signals.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
