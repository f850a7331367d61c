// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trading-signal feed trait.

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{SignalQuery, TradingSignal};

/// Read-only trading-signal source.
#[async_trait]
pub trait SignalFeed: Send + Sync {
    /// Fetches signals matching the query, newest first.
    async fn signals(&self, query: SignalQuery) -> Result<Vec<TradingSignal>, QuiverError>;
}
