// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions.
//!
//! Every external service this core consumes is modeled as an async trait
//! taking and returning the data shapes in [`crate::types`]. These are
//! data-shape contracts, not transport contracts; `#[async_trait]` keeps
//! them object-safe for dynamic dispatch.

pub mod host;
pub mod market;
pub mod news;
pub mod offers;
pub mod payments;
pub mod signals;

pub use host::HostBridge;
pub use market::MarketData;
pub use news::NewsFeed;
pub use offers::OfferDirectory;
pub use payments::PaymentGateway;
pub use signals::SignalFeed;
