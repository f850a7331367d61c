// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Quiver state core.
//!
//! This crate provides the domain types, error type, and collaborator
//! traits used throughout the Quiver workspace. The stores and the
//! orchestration service are built entirely on the shapes defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::QuiverError;
pub use types::{
    Checkout, Coin, CoinDetail, CpaCampaign, CpaCompletion, Fetched, HostUser,
    PendingRewards, PremiumAccess, Subscription, TradingSignal, User, WatchlistItem,
};

// Re-export all collaborator traits at crate root.
pub use traits::{HostBridge, MarketData, NewsFeed, OfferDirectory, PaymentGateway, SignalFeed};
