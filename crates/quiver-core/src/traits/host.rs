// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host platform bridge trait (identity and one-shot capabilities).

use async_trait::async_trait;

use crate::error::QuiverError;
use crate::types::{HapticPulse, HostUser};

/// Bridge to the hosting mini-app container.
///
/// Capability calls are one-shot: fire-and-forget pulses or single-value
/// dialogs. No retry contract is owed by this core.
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// The identity supplied by the host, if any is available yet.
    async fn identity(&self) -> Option<HostUser>;

    /// Emits a haptic pulse. Failures are the bridge's to swallow.
    async fn haptic(&self, pulse: HapticPulse);

    /// Shows a confirm dialog and resolves to the user's answer.
    async fn confirm(&self, message: &str) -> Result<bool, QuiverError>;

    /// Shows an alert dialog.
    async fn alert(&self, message: &str) -> Result<(), QuiverError>;
}
