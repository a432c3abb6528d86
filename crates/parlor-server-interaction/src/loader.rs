// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use parlor_common_i18n::{resolve_locale_with_default, Locale};
use parlor_server_db::SettingsRecord;
use parlor_server_settings::SettingsService;

use crate::context::{RenderBundle, UserIdentity};
use crate::error::{InteractionError, Result};
use crate::interaction::{Interaction, Originator};

/// Builds a [`RenderBundle`]: identity, then settings, then locale.
#[derive(Clone)]
pub struct ContextLoader {
	settings: SettingsService,
	default_locale: Locale,
}

impl ContextLoader {
	pub fn new(settings: SettingsService, default_locale: Locale) -> Self {
		Self {
			settings,
			default_locale,
		}
	}

	pub fn settings(&self) -> &SettingsService {
		&self.settings
	}

	pub fn resolve_identity(originator: Option<&Originator>) -> Result<UserIdentity> {
		originator
			.map(UserIdentity::from_originator)
			.ok_or(InteractionError::MissingOriginator)
	}

	/// The stored language when supported, otherwise the configured default.
	pub fn resolve_locale(&self, record: &SettingsRecord) -> Locale {
		resolve_locale_with_default(record.language(), self.default_locale)
	}

	#[tracing::instrument(skip_all, fields(user_id = ?originator.map(|o| o.id)))]
	pub async fn load(&self, originator: Option<&Originator>) -> Result<RenderBundle> {
		let user = Self::resolve_identity(originator)?;
		let settings = self.settings.get_or_create(user.id).await?;
		let locale = self.resolve_locale(&settings);
		tracing::debug!(%locale, onboarded = settings.onboarded, "render context loaded");

		Ok(RenderBundle {
			user,
			settings,
			locale,
		})
	}

	/// Load the interaction's bundle unless it is already cached.
	pub async fn ensure<'a>(&self, interaction: &'a mut Interaction) -> Result<&'a RenderBundle> {
		let Interaction {
			originator,
			context,
			..
		} = interaction;
		let originator = originator.as_ref();
		context.ensure(|| self.load(originator)).await
	}
}
