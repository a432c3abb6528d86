// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings database location and pool size.

use serde::Deserialize;

use crate::error::ConfigError;

const DEFAULT_DATABASE_URL: &str = "sqlite:./parlor.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
	/// SQLite connection string; only the `sqlite:` scheme is served.
	pub url: String,
	pub max_connections: u32,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_DATABASE_URL.to_string(),
			max_connections: DEFAULT_MAX_CONNECTIONS,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub max_connections: Option<u32>,
}

impl DatabaseConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.max_connections.is_some() {
			self.max_connections = other.max_connections;
		}
	}

	pub fn finalize(self) -> Result<DatabaseConfig, ConfigError> {
		let url = self
			.url
			.unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
		if !url.starts_with("sqlite:") {
			return Err(ConfigError::InvalidValue {
				key: "database.url".to_string(),
				message: format!("'{url}' is not a sqlite: URL"),
			});
		}

		let max_connections = self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS);
		if max_connections == 0 {
			return Err(ConfigError::InvalidValue {
				key: "database.max_connections".to_string(),
				message: "must be at least 1".to_string(),
			});
		}

		Ok(DatabaseConfig {
			url,
			max_connections,
		})
	}
}
