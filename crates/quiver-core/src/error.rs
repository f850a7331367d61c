// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Quiver state core.

use thiserror::Error;

/// The primary error type used across all Quiver collaborator traits and flows.
#[derive(Debug, Error)]
pub enum QuiverError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Collaborator errors (transport failure, non-success status, malformed body).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Payment gateway rejected or could not service the request.
    #[error("payment error: {0}")]
    Payment(String),

    /// A flow that needs an initialized user ran before any session existed.
    #[error("no user session")]
    NoSession,

    /// Referenced campaign is not present in the current catalog.
    #[error("campaign not found: {campaign_id}")]
    CampaignNotFound { campaign_id: String },

    /// Campaign exists but is expired, inactive, or at its completion cap.
    #[error("campaign unavailable: {campaign_id}")]
    CampaignUnavailable { campaign_id: String },

    /// User already has a completed completion for this campaign.
    #[error("campaign already completed: {campaign_id}")]
    CampaignAlreadyCompleted { campaign_id: String },

    /// A checkout flow operation ran with no checkout in progress.
    #[error("no checkout in progress")]
    NoCheckout,

    /// Feature requires an active subscription.
    #[error("premium subscription required for {feature}")]
    PremiumRequired { feature: &'static str },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
