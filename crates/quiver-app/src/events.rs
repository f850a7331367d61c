// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cross-store effects and flow outcomes produced by the orchestration
//! service.
//!
//! A [`DomainEvent`] is emitted by the flow that causes it and consumed
//! within the same service call by applying the matching multi-store
//! writes; callers receive the events back as a record of what happened.

use quiver_core::types::{PaymentStatus, RewardType, SubscriptionPlan};

/// A state change that crosses store boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainEvent {
    /// A checkout settled and its subscription now grants access.
    SubscriptionActivated {
        subscription_id: String,
        plan: SubscriptionPlan,
    },
    /// A completed campaign reward was claimed.
    RewardClaimed {
        completion_id: String,
        campaign_id: String,
        reward_type: RewardType,
        amount: u32,
    },
}

/// Outcome of one checkout poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutProgress {
    /// Not settled yet; the checkout stays held for the next poll.
    Pending(PaymentStatus),
    /// Settled; the subscription is active and the checkout consumed.
    Activated(DomainEvent),
    /// Terminal failure; the checkout was dropped so a fresh one can start.
    Failed(PaymentStatus),
}
