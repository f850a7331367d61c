// SPDX-FileCopyrightText: 2026 Quiver Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent state stores for the Quiver reconciliation core.
//!
//! This crate provides:
//! - **Database**: SQLite-backed snapshot table shared by every store
//! - **Persistence primitive**: versioned partial snapshots with
//!   load-or-default recovery and best-effort writes
//! - **Domain stores**: user/subscription, CPA campaigns and rewards,
//!   coins, and trading signals

pub mod coins;
pub mod cpa;
pub mod db;
pub mod persist;
pub mod signals;
pub mod user;

pub use coins::{CoinsState, CoinsStore};
pub use cpa::{CpaState, CpaStore};
pub use db::Database;
pub use persist::{Persisted, StoreState};
pub use signals::{SignalsState, SignalsStore};
pub use user::{UserState, UserStore};
