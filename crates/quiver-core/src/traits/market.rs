// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Market-data provider trait (coin lists, detail snapshots, price history).

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{ChartData, Coin, CoinDetail, Fetched};

/// Read-only market-data source.
///
/// Implementations may substitute built-in fallback data on upstream
/// failure; they signal that via [`Fetched::using_fallback`].
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetches one page of the coin list, ordered by market cap descending.
    async fn coins(&self, page: u32) -> Result<Fetched<Vec<Coin>>, QuiverError>;

    /// Fetches the full detail snapshot for one coin.
    async fn coin_detail(&self, coin_id: &str) -> Result<Fetched<CoinDetail>, QuiverError>;

    /// Fetches the price-history chart for one coin over the last `days`.
    async fn market_chart(
        &self,
        coin_id: &str,
        days: u32,
    ) -> Result<Fetched<ChartData>, QuiverError>;
}
