// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for Parlor.
//!
//! - [`SettingsStore`]: row-level access to user settings, as consumed by the
//!   settings service
//! - [`SettingsRepository`]: the SQLite implementation
//! - [`create_pool`] / [`run_migrations`]: connection and schema setup

pub mod error;
pub mod pool;
pub mod settings;
pub mod types;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{DbError, Result};
pub use pool::{create_pool, create_pool_with_max_connections, run_migrations};
pub use settings::{SettingsRepository, SettingsStore, SETTINGS_TABLE};
pub use types::{SettingsFields, SettingsRecord, UserId};

pub use sqlx::sqlite::SqlitePool;
