// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Quiver state core.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use quiver_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("App name: {}", config.app.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{FeatureFlags, MarketConfig, NewsConfig, QuiverConfig};

use quiver_core::QuiverError;

/// Load configuration from the XDG hierarchy and validate it.
///
/// This is the high-level entry point: loads config from TOML files plus
/// env vars via Figment, then runs post-deserialization validation.
pub fn load_and_validate() -> Result<QuiverConfig, QuiverError> {
    let config = loader::load_config().map_err(|err| QuiverError::Config(err.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<QuiverConfig, QuiverError> {
    let config = loader::load_config_from_str(toml_content)
        .map_err(|err| QuiverError::Config(err.to_string()))?;
    validation::validate_config(&config)?;
    Ok(config)
}
