// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment processor trait.

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{Checkout, PaymentMethod, PaymentStatus, SubscriptionPlan};

/// External payment processor.
///
/// The processor owns payment lifecycle entirely; this core only opens
/// checkouts and polls status. Only settled outcomes
/// ([`PaymentStatus::is_settled`]) may activate a subscription.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Opens a checkout: creates a pending payment plus the pending
    /// subscription it will fund.
    async fn create_checkout(
        &self,
        user_id: i64,
        plan: SubscriptionPlan,
        method: PaymentMethod,
    ) -> Result<Checkout, QuiverError>;

    /// Reports the current status of a payment.
    async fn payment_status(&self, payment_id: &str) -> Result<PaymentStatus, QuiverError>;
}
