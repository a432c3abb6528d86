// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale resolution logic.

use crate::locale::{Locale, DEFAULT_LOCALE};

/// Resolve the effective locale from a user's stored language code.
///
/// Absent, empty, and unsupported codes all resolve to [`DEFAULT_LOCALE`].
/// Resolution never fails.
///
/// # Example
///
/// ```
/// use parlor_common_i18n::{resolve_locale, Locale, DEFAULT_LOCALE};
///
/// assert_eq!(resolve_locale(Some("es")), Locale::Es);
/// assert_eq!(resolve_locale(Some("xx-unsupported")), DEFAULT_LOCALE);
/// assert_eq!(resolve_locale(None), DEFAULT_LOCALE);
/// ```
pub fn resolve_locale(user_locale: Option<&str>) -> Locale {
	resolve_locale_with_default(user_locale, DEFAULT_LOCALE)
}

/// Resolve the effective locale from user preference and server default.
///
/// Resolution order (highest to lowest priority):
/// 1. User's stored locale code (if supported)
/// 2. `server_default`
///
/// # Arguments
///
/// * `user_locale` - Raw code from the user's settings (may be None or invalid)
/// * `server_default` - Deployment-wide default locale from configuration
pub fn resolve_locale_with_default(user_locale: Option<&str>, server_default: Locale) -> Locale {
	user_locale
		.and_then(Locale::from_code)
		.unwrap_or(server_default)
}
