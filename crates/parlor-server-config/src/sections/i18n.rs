// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Localization configuration.

use parlor_common_i18n::{Locale, DEFAULT_LOCALE};
use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct I18nConfig {
	/// Locale for users whose stored language is absent or unsupported.
	pub default_locale: Locale,
}

impl Default for I18nConfig {
	fn default() -> Self {
		Self {
			default_locale: DEFAULT_LOCALE,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct I18nConfigLayer {
	#[serde(default)]
	pub default_locale: Option<String>,
}

impl I18nConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.default_locale.is_some() {
			self.default_locale = other.default_locale;
		}
	}

	pub fn finalize(self) -> Result<I18nConfig, ConfigError> {
		let default_locale = match self.default_locale {
			Some(code) => code.parse().map_err(|_| ConfigError::InvalidValue {
				key: "i18n.default_locale".to_string(),
				message: format!("unsupported locale '{code}'"),
			})?,
			None => DEFAULT_LOCALE,
		};
		Ok(I18nConfig { default_locale })
	}
}
