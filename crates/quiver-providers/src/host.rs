// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock host bridge recording capability calls.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use quiver_core::error::QuiverError;
use quiver_core::types::{HapticPulse, HostUser};
use quiver_core::HostBridge;

/// A host bridge double with a fixed identity and recorded capability
/// calls. Confirm dialogs pop a scripted answer queue; an empty queue
/// answers `true`.
pub struct MockHostBridge {
    identity: Option<HostUser>,
    haptics: Arc<Mutex<Vec<HapticPulse>>>,
    alerts: Arc<Mutex<Vec<String>>>,
    confirms: Arc<Mutex<VecDeque<bool>>>,
}

impl MockHostBridge {
    /// Creates a bridge handing over the development identity.
    pub fn new() -> Self {
        Self::with_identity(Some(HostUser {
            id: 123_456_789,
            first_name: "Dev".to_string(),
            last_name: Some("User".to_string()),
            username: Some("devuser".to_string()),
            language_code: Some("en".to_string()),
            is_premium: false,
        }))
    }

    /// Creates a bridge that has no identity to hand over.
    pub fn without_identity() -> Self {
        Self::with_identity(None)
    }

    /// Creates a bridge with an explicit identity.
    pub fn with_identity(identity: Option<HostUser>) -> Self {
        Self {
            identity,
            haptics: Arc::new(Mutex::new(Vec::new())),
            alerts: Arc::new(Mutex::new(Vec::new())),
            confirms: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queues the answer for the next confirm dialog.
    pub async fn script_confirm(&self, answer: bool) {
        self.confirms.lock().await.push_back(answer);
    }

    /// Haptic pulses emitted so far.
    pub async fn haptics(&self) -> Vec<HapticPulse> {
        self.haptics.lock().await.clone()
    }

    /// Alert messages shown so far.
    pub async fn alerts(&self) -> Vec<String> {
        self.alerts.lock().await.clone()
    }
}

impl Default for MockHostBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostBridge for MockHostBridge {
    async fn identity(&self) -> Option<HostUser> {
        self.identity.clone()
    }

    async fn haptic(&self, pulse: HapticPulse) {
        debug!(?pulse, "mock haptic pulse");
        self.haptics.lock().await.push(pulse);
    }

    async fn confirm(&self, message: &str) -> Result<bool, QuiverError> {
        let answer = self.confirms.lock().await.pop_front().unwrap_or(true);
        debug!(message, answer, "mock confirm dialog");
        Ok(answer)
    }

    async fn alert(&self, message: &str) -> Result<(), QuiverError> {
        debug!(message, "mock alert dialog");
        self.alerts.lock().await.push(message.to_string());
        Ok(())
    }
}
