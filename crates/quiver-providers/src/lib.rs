// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! External-service adapters for the Quiver state core.
//!
//! Two kinds of collaborator implementations live here:
//!
//! - HTTP adapters for the market-data and news APIs, each degrading to
//!   built-in sample data when unconfigured or when the upstream fails.
//! - Mock collaborators (payment gateway, CPA directory, signal feed,
//!   host bridge) with scriptable behavior for demos and tests.

pub mod host;
pub mod market;
pub mod news;
pub mod offers;
pub mod payments;
pub mod signals;

pub use host::MockHostBridge;
pub use market::HttpMarketData;
pub use news::HttpNewsFeed;
pub use offers::MockOfferDirectory;
pub use payments::MockPaymentGateway;
pub use signals::MockSignalFeed;
