// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Supported locales and their metadata.

use std::fmt;
use std::str::FromStr;

/// A locale the bot has a message catalog for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Locale {
	#[default]
	En,
	Es,
	Ru,
}

/// The locale used whenever a stored code is absent or unsupported.
pub const DEFAULT_LOCALE: Locale = Locale::En;

/// Static metadata describing a supported locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleInfo {
	pub locale: Locale,
	pub code: &'static str,
	pub name: &'static str,
	pub native_name: &'static str,
}

pub const LOCALES: &[LocaleInfo] = &[
	LocaleInfo {
		locale: Locale::En,
		code: "en",
		name: "English",
		native_name: "English",
	},
	LocaleInfo {
		locale: Locale::Es,
		code: "es",
		name: "Spanish",
		native_name: "Español",
	},
	LocaleInfo {
		locale: Locale::Ru,
		code: "ru",
		name: "Russian",
		native_name: "Русский",
	},
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale code: {0:?}")]
pub struct ParseLocaleError(pub String);

impl Locale {
	pub const ALL: [Locale; 3] = [Locale::En, Locale::Es, Locale::Ru];

	/// Look up a locale by its exact code. Matching is case-sensitive and
	/// region-suffixed codes (`en-US`) are not reduced to their base language.
	pub fn from_code(code: &str) -> Option<Locale> {
		LOCALES
			.iter()
			.find(|info| info.code == code)
			.map(|info| info.locale)
	}

	pub fn code(self) -> &'static str {
		self.info().code
	}

	pub fn info(self) -> &'static LocaleInfo {
		match self {
			Locale::En => &LOCALES[0],
			Locale::Es => &LOCALES[1],
			Locale::Ru => &LOCALES[2],
		}
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.code())
	}
}

impl FromStr for Locale {
	type Err = ParseLocaleError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Locale::from_code(s).ok_or_else(|| ParseLocaleError(s.to_string()))
	}
}

/// Returns true if `code` names a supported locale.
pub fn is_supported(code: &str) -> bool {
	Locale::from_code(code).is_some()
}

pub fn available_locales() -> &'static [LocaleInfo] {
	LOCALES
}

pub fn locale_info(code: &str) -> Option<&'static LocaleInfo> {
	LOCALES.iter().find(|info| info.code == code)
}
