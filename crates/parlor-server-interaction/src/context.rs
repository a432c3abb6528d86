// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lazily loaded, per-interaction render state.

use std::future::Future;

use parlor_common_i18n::Locale;
use parlor_server_db::{SettingsRecord, UserId};
use tracing::debug;

use crate::interaction::Originator;

/// Who the reply is addressed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
	pub id: UserId,
	pub display_name: Option<String>,
}

impl UserIdentity {
	/// Display name is "first last", else "@username", else none.
	pub fn from_originator(originator: &Originator) -> Self {
		let full_name = [&originator.first_name, &originator.last_name]
			.into_iter()
			.filter_map(|part| part.as_deref().map(str::trim))
			.filter(|part| !part.is_empty())
			.collect::<Vec<_>>()
			.join(" ");

		let display_name = if !full_name.is_empty() {
			Some(full_name)
		} else {
			originator
				.username
				.as_deref()
				.map(str::trim)
				.filter(|u| !u.is_empty())
				.map(|u| format!("@{u}"))
		};

		Self {
			id: originator.id,
			display_name,
		}
	}
}

/// Everything a screen needs to render a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBundle {
	pub user: UserIdentity,
	pub settings: SettingsRecord,
	pub locale: Locale,
}

/// Partial replacement for a cached [`RenderBundle`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BundlePatch {
	pub user: Option<UserIdentity>,
	pub settings: Option<SettingsRecord>,
	pub locale: Option<Locale>,
}

impl BundlePatch {
	pub fn settings(settings: SettingsRecord) -> Self {
		Self {
			settings: Some(settings),
			..Default::default()
		}
	}

	pub fn with_locale(mut self, locale: Locale) -> Self {
		self.locale = Some(locale);
		self
	}

	pub fn is_empty(&self) -> bool {
		self.user.is_none() && self.settings.is_none() && self.locale.is_none()
	}
}

/// Holds at most one [`RenderBundle`] for the lifetime of an interaction.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
	bundle: Option<RenderBundle>,
}

impl RenderContext {
	pub fn get(&self) -> Option<&RenderBundle> {
		self.bundle.as_ref()
	}

	/// Return the cached bundle, or run `load` once and cache its result.
	///
	/// A failed load leaves the context empty, so the next call loads again.
	pub async fn ensure<F, Fut, E>(&mut self, load: F) -> Result<&RenderBundle, E>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<RenderBundle, E>>,
	{
		let bundle = match self.bundle.take() {
			Some(cached) => {
				debug!(user_id = %cached.user.id, "render context hit");
				cached
			}
			None => {
				debug!("render context miss, loading");
				load().await?
			}
		};
		let bundle: &RenderBundle = self.bundle.insert(bundle);
		Ok(bundle)
	}

	/// Replace the fields present in `patch`. Does nothing before the first
	/// successful load.
	pub fn patch(&mut self, patch: BundlePatch) {
		if patch.is_empty() {
			return;
		}
		let Some(bundle) = self.bundle.as_mut() else {
			debug!("render context empty, ignoring patch");
			return;
		};
		if let Some(user) = patch.user {
			bundle.user = user;
		}
		if let Some(settings) = patch.settings {
			bundle.settings = settings;
		}
		if let Some(locale) = patch.locale {
			bundle.locale = locale;
		}
	}
}
