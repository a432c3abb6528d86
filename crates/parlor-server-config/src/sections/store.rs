// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings store behaviour: call timeouts and write retries.

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
	/// Upper bound on a single store call.
	pub timeout_ms: u64,
	/// Extra attempts a merge-patch makes after losing a concurrent write.
	pub patch_retries: u32,
}

impl StoreConfig {
	pub fn timeout(&self) -> Duration {
		Duration::from_millis(self.timeout_ms)
	}
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			timeout_ms: 5_000,
			patch_retries: 3,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct StoreConfigLayer {
	#[serde(default)]
	pub timeout_ms: Option<u64>,
	#[serde(default)]
	pub patch_retries: Option<u32>,
}

impl StoreConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.timeout_ms.is_some() {
			self.timeout_ms = other.timeout_ms;
		}
		if other.patch_retries.is_some() {
			self.patch_retries = other.patch_retries;
		}
	}

	pub fn finalize(self) -> StoreConfig {
		let defaults = StoreConfig::default();
		StoreConfig {
			timeout_ms: self.timeout_ms.unwrap_or(defaults.timeout_ms),
			patch_retries: self.patch_retries.unwrap_or(defaults.patch_retries),
		}
	}
}
