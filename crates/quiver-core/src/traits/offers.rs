// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CPA campaign directory trait.

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{CampaignQuery, CpaCampaign, CpaCompletion};

/// External cost-per-action campaign directory.
#[async_trait]
pub trait OfferDirectory: Send + Sync {
    /// Lists campaigns matching the query.
    async fn campaigns(&self, query: CampaignQuery) -> Result<Vec<CpaCampaign>, QuiverError>;

    /// Submits a completion attempt and receives back a pending ledger
    /// entry. Verification happens asynchronously on the directory side.
    async fn submit_completion(
        &self,
        campaign_id: &str,
        user_id: i64,
        verification: serde_json::Value,
    ) -> Result<CpaCompletion, QuiverError>;

    /// Reports the directory's current view of a completion, reflecting any
    /// verification outcome reached since submission.
    async fn completion_status(
        &self,
        completion_id: &str,
    ) -> Result<CpaCompletion, QuiverError>;
}
