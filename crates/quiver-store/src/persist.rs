// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The persistence primitive shared by every store.
//!
//! A store keeps its full state in memory and mirrors a selected subset
//! (the snapshot) to the `store_snapshots` table after every mutation.
//! Loading never fails: a missing, corrupt, or newer-versioned snapshot
//! falls back to defaults, and write failures are logged and swallowed.
//! The in-memory state is authoritative at all times.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::db::Database;

/// State that can be wrapped in a [`Persisted`] store.
///
/// `Snapshot` is the persisted subset of the state. Fields excluded from
/// it (session caches, loading flags, errors) reset to their defaults on
/// every restore, and fields added in later versions fill in from
/// `Default` when an older snapshot is loaded.
pub trait StoreState: Default {
    type Snapshot: Serialize + DeserializeOwned + Default;

    /// Name of the snapshot row, unique per store.
    const STORE: &'static str;
    /// Bumped when `Snapshot` changes incompatibly.
    const VERSION: u32;

    /// Extract the persisted subset from the live state.
    fn capture(&self) -> Self::Snapshot;
    /// Apply a loaded snapshot onto default state.
    fn restore(&mut self, snapshot: Self::Snapshot);
}

/// A store whose state survives restarts via the snapshot table.
pub struct Persisted<S: StoreState> {
    state: S,
    db: Database,
}

impl<S: StoreState> Persisted<S> {
    /// Open the store, hydrating from the persisted snapshot when one is
    /// readable and at a known version. Never fails: every load problem
    /// degrades to default state.
    pub async fn open(db: Database) -> Self {
        let mut state = S::default();
        match db.load_snapshot(S::STORE).await {
            Ok(Some(row)) => {
                if row.version > S::VERSION {
                    warn!(
                        store = S::STORE,
                        found = row.version,
                        supported = S::VERSION,
                        "snapshot version is newer than this build, starting from defaults"
                    );
                } else {
                    match serde_json::from_str::<S::Snapshot>(&row.payload) {
                        Ok(snapshot) => {
                            state.restore(snapshot);
                            debug!(store = S::STORE, version = row.version, "snapshot restored");
                        }
                        Err(err) => {
                            warn!(
                                store = S::STORE,
                                error = %err,
                                "discarding corrupt snapshot, starting from defaults"
                            );
                        }
                    }
                }
            }
            Ok(None) => {
                debug!(store = S::STORE, "no snapshot, starting from defaults");
            }
            Err(err) => {
                warn!(
                    store = S::STORE,
                    error = %err,
                    "snapshot load failed, starting from defaults"
                );
            }
        }
        Self { state, db }
    }

    /// Read access to the live state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Apply a mutation and persist the resulting snapshot. The mutation
    /// always takes effect in memory; the write is best-effort.
    pub async fn mutate<R>(&mut self, update: impl FnOnce(&mut S) -> R) -> R {
        let out = update(&mut self.state);
        self.flush().await;
        out
    }

    async fn flush(&self) {
        let payload = match serde_json::to_string(&self.state.capture()) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    store = S::STORE,
                    error = %err,
                    "snapshot serialization failed, in-memory state remains authoritative"
                );
                return;
            }
        };
        if let Err(err) = self.db.save_snapshot(S::STORE, S::VERSION, payload).await {
            warn!(
                store = S::STORE,
                error = %err,
                "snapshot write failed, in-memory state remains authoritative"
            );
        }
    }
}
