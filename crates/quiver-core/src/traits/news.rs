// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! News provider trait.

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{Fetched, NewsPage};

/// Read-only news source.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    /// Fetches one page of articles, optionally narrowed to currency codes
    /// (e.g. `["BTC", "ETH"]`). Pagination is opaque: page number in,
    /// has-next marker out.
    async fn latest(
        &self,
        currencies: &[String],
        page: u32,
    ) -> Result<Fetched<NewsPage>, QuiverError>;
}
