// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for values Figment cannot check.

use quiver_core::QuiverError;

use crate::model::QuiverConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate constraints that span fields or involve value vocabularies.
pub fn validate_config(config: &QuiverConfig) -> Result<(), QuiverError> {
    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        return Err(QuiverError::Config(format!(
            "app.log_level must be one of {LOG_LEVELS:?}, got {:?}",
            config.app.log_level
        )));
    }
    if config.market.page_size == 0 {
        return Err(QuiverError::Config(
            "market.page_size must be at least 1".to_string(),
        ));
    }
    if config.signals.limit == 0 {
        return Err(QuiverError::Config(
            "signals.limit must be at least 1".to_string(),
        ));
    }
    if config.storage.database_path.is_empty() {
        return Err(QuiverError::Config(
            "storage.database_path must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&QuiverConfig::default()).is_ok());
    }

    #[test]
    fn bogus_log_level_is_rejected() {
        let mut config = QuiverConfig::default();
        config.app.log_level = "loud".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("app.log_level"));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let mut config = QuiverConfig::default();
        config.market.page_size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn partial_document_fills_defaults_and_validates() {
        let toml_str = r#"
[app]
name = "Quiver Test"

[market]
page_size = 25
"#;
        let config: QuiverConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.app.name, "Quiver Test");
        assert_eq!(config.market.page_size, 25);
        assert_eq!(config.app.log_level, "info");
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_limits_from_a_document_are_rejected() {
        let toml_str = r#"
[signals]
limit = 0
"#;
        let config: QuiverConfig = toml::from_str(toml_str).unwrap();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("signals.limit"));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let toml_str = r#"
[market]
page_sise = 50
"#;
        assert!(toml::from_str::<QuiverConfig>(toml_str).is_err());
    }
}
