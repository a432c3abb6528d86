// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod database;
mod i18n;
mod logging;
mod store;

pub use database::{DatabaseConfig, DatabaseConfigLayer};
pub use i18n::{I18nConfig, I18nConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use store::{StoreConfig, StoreConfigLayer};
