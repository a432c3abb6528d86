// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for Parlor.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`PARLOR_*`)
//!
//! # Usage
//!
//! ```ignore
//! use parlor_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Settings database at {}", config.database.url);
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub database: DatabaseConfig,
	pub store: StoreConfig,
	pub i18n: I18nConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PARLOR_*`)
/// 2. Config file (`/etc/parlor/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let database = layer.database.unwrap_or_default().finalize()?;
	let store = layer.store.unwrap_or_default().finalize();
	let i18n = layer.i18n.unwrap_or_default().finalize()?;
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&store)?;

	info!(
		database = %database.url,
		max_connections = database.max_connections,
		store_timeout_ms = store.timeout_ms,
		patch_retries = store.patch_retries,
		default_locale = %i18n.default_locale,
		"Configuration loaded"
	);

	Ok(ServerConfig {
		database,
		store,
		i18n,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(store: &StoreConfig) -> Result<(), ConfigError> {
	if store.timeout_ms == 0 {
		return Err(ConfigError::Validation(
			"store.timeout_ms must be greater than zero; every store call would time out immediately"
				.to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use parlor_common_i18n::Locale;

	#[test]
	fn test_zero_timeout_is_rejected() {
		let store = StoreConfig {
			timeout_ms: 0,
			..Default::default()
		};
		let result = validate_config(&store);
		assert!(result.unwrap_err().to_string().contains("timeout_ms"));
	}

	#[test]
	fn test_finalize_empty_layer_uses_defaults() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config.database.url, "sqlite:./parlor.db");
		assert_eq!(config.store, StoreConfig::default());
		assert_eq!(config.i18n.default_locale, Locale::En);
		assert_eq!(config.logging, LoggingConfig::default());
	}

	#[test]
	fn test_finalize_rejects_unknown_default_locale() {
		let layer = ServerConfigLayer {
			i18n: Some(I18nConfigLayer {
				default_locale: Some("xx".to_string()),
			}),
			..Default::default()
		};
		assert!(matches!(
			finalize(layer),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_load_config_with_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("parlor.toml");
		std::fs::write(
			&path,
			"[store]\npatch_retries = 5\n\n[i18n]\ndefault_locale = \"es\"\n",
		)
		.unwrap();

		let sources: Vec<Box<dyn ConfigSource>> =
			vec![Box::new(TomlSource::new(&path)), Box::new(DefaultsSource)];
		let config = load_from_sources(sources).unwrap();
		assert_eq!(config.store.patch_retries, 5);
		assert_eq!(config.i18n.default_locale, Locale::Es);
	}
}
