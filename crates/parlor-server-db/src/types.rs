// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Messaging-platform identifier of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
	pub fn new(id: i64) -> Self {
		Self(id)
	}

	pub fn into_inner(self) -> i64 {
		self.0
	}
}

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<i64> for UserId {
	fn from(id: i64) -> Self {
		Self(id)
	}
}

impl From<UserId> for i64 {
	fn from(id: UserId) -> Self {
		id.0
	}
}

/// Well-known keys of the settings bag.
pub struct SettingsFields;

impl SettingsFields {
	pub const LANGUAGE: &'static str = "language";
	pub const THEME: &'static str = "theme";
}

/// One user's persisted preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
	pub user_id: UserId,
	/// Only ever moves from false to true.
	pub onboarded: bool,
	/// Open preference bag; `None` until the first patch.
	pub settings_json: Option<Map<String, Value>>,
	/// Bumped by every write; used for compare-and-swap updates.
	pub version: i64,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl SettingsRecord {
	/// A fresh record as inserted on first contact.
	pub fn new(user_id: UserId) -> Self {
		let now = Utc::now();
		Self {
			user_id,
			onboarded: false,
			settings_json: None,
			version: 0,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn setting(&self, key: &str) -> Option<&Value> {
		self.settings_json.as_ref()?.get(key)
	}

	/// The stored language code, if it is a string.
	pub fn language(&self) -> Option<&str> {
		self.setting(SettingsFields::LANGUAGE)?.as_str()
	}
}
