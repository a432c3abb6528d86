// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User settings service for Parlor.
//!
//! Wraps a [`parlor_server_db::SettingsStore`] with the semantics callers
//! rely on: a record always exists once asked for, patches merge shallowly
//! without losing concurrent writes, and every store call is time-bounded.

pub mod error;
pub mod service;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{SettingsError, SettingsResult};
pub use service::{merge_settings, SettingsService};
