// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Internationalization (i18n) support for Parlor.
//!
//! This crate provides the message catalogs the bot speaks from, template
//! rendering with named parameters, and resolution of stored language codes
//! into a supported [`Locale`].
//!
//! # String Naming Convention
//!
//! All templates use a hierarchical dot-notation key format:
//!
//! - `common.` for shared labels (buttons, generic errors)
//! - `screens.<screen>.` for text belonging to one screen
//!
//! Example: `screens.settings.choose_option`
//!
//! A key that does not resolve to a template is returned unchanged, so a
//! missing translation shows up as its key rather than failing the caller.
//!
//! # Example
//!
//! ```
//! use parlor_common_i18n::{resolve_locale, t, t_fmt, Locale, Params};
//!
//! // Simple translation
//! let title = t(Locale::Es, "screens.settings.title");
//! assert_eq!(title, "Ajustes");
//!
//! // Translation with variables
//! let greeting = t_fmt(
//! 	Locale::En,
//! 	"screens.start.welcome_back",
//! 	&Params::new().with("name", "Ana"),
//! );
//! assert_eq!(greeting, "Welcome back, Ana!");
//!
//! // Resolve a stored language code
//! assert_eq!(resolve_locale(Some("ru")), Locale::Ru);
//! assert_eq!(resolve_locale(None), Locale::En);
//! ```

mod catalog;
mod format;
mod locale;
mod resolve;

pub use catalog::{catalog_keys, has_key, t, t_default, t_fmt};
pub use format::Params;
pub use locale::{
	available_locales, is_supported, locale_info, Locale, LocaleInfo, ParseLocaleError,
};
pub use resolve::{resolve_locale, resolve_locale_with_default};

pub use locale::{DEFAULT_LOCALE, LOCALES};
