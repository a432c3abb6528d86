// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Settings writes that keep the interaction's cached bundle in step.

use parlor_common_i18n::Locale;
use parlor_server_db::{SettingsFields, SettingsRecord};
use parlor_server_settings::SettingsService;
use serde_json::{Map, Value};

use crate::context::{BundlePatch, RenderBundle};
use crate::error::{InteractionError, Result};
use crate::interaction::Interaction;
use crate::loader::ContextLoader;
use crate::responder::Responder;

#[derive(Clone)]
pub struct ContextService {
	loader: ContextLoader,
}

impl ContextService {
	pub fn new(settings: SettingsService, default_locale: Locale) -> Self {
		Self {
			loader: ContextLoader::new(settings, default_locale),
		}
	}

	pub fn loader(&self) -> &ContextLoader {
		&self.loader
	}

	pub fn responder(&self) -> Responder {
		Responder::new(self.loader.clone())
	}

	pub async fn ensure<'a>(&self, interaction: &'a mut Interaction) -> Result<&'a RenderBundle> {
		self.loader.ensure(interaction).await
	}

	/// Persist a merge-patch and refresh the cached settings. The cached
	/// locale is always re-derived from the returned record, since the stored
	/// language may have been changed by another interaction.
	#[tracing::instrument(skip_all, fields(user_id = ?interaction.user_id(), keys = patch.len()))]
	pub async fn update_settings(
		&self,
		interaction: &mut Interaction,
		patch: Map<String, Value>,
	) -> Result<SettingsRecord> {
		let user_id = interaction
			.user_id()
			.ok_or(InteractionError::MissingOriginator)?;
		let record = self.loader.settings().merge_patch(user_id, patch).await?;

		interaction.context.patch(
			BundlePatch::settings(record.clone())
				.with_locale(self.loader.resolve_locale(&record)),
		);

		Ok(record)
	}

	pub async fn set_language(
		&self,
		interaction: &mut Interaction,
		locale: Locale,
	) -> Result<SettingsRecord> {
		let mut patch = Map::new();
		patch.insert(
			SettingsFields::LANGUAGE.to_string(),
			Value::String(locale.code().to_string()),
		);
		self.update_settings(interaction, patch).await
	}

	#[tracing::instrument(skip_all, fields(user_id = ?interaction.user_id()))]
	pub async fn complete_onboarding(
		&self,
		interaction: &mut Interaction,
	) -> Result<SettingsRecord> {
		let user_id = interaction
			.user_id()
			.ok_or(InteractionError::MissingOriginator)?;

		let record = self.loader.settings().set_onboarded(user_id).await?;
		interaction
			.context
			.patch(BundlePatch::settings(record.clone()));
		Ok(record)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::interaction::{ChatId, Originator};
	use parlor_server_config::StoreConfig;
	use parlor_server_db::UserId;
	use parlor_server_settings::testing::InMemorySettingsStore;
	use serde_json::json;
	use std::sync::Arc;

	fn service_over(store: Arc<InMemorySettingsStore>) -> ContextService {
		ContextService::new(
			SettingsService::new(store, StoreConfig::default()),
			Locale::En,
		)
	}

	fn interaction(id: i64) -> Interaction {
		Interaction::fresh(ChatId(1), Some(Originator::new(UserId::new(id))))
	}

	#[tokio::test]
	async fn language_change_updates_cached_locale() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store.clone());
		let mut interaction = interaction(1);

		assert_eq!(service.ensure(&mut interaction).await.unwrap().locale, Locale::En);

		service.set_language(&mut interaction, Locale::Ru).await.unwrap();

		let bundle = interaction.context.get().unwrap();
		assert_eq!(bundle.locale, Locale::Ru);
		assert_eq!(bundle.settings.language(), Some("ru"));
		assert_eq!(store.select_calls(), 2);
	}

	#[tokio::test]
	async fn other_keys_keep_cached_locale() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store);
		let mut interaction = interaction(2);
		service.set_language(&mut interaction, Locale::Es).await.unwrap();
		service.ensure(&mut interaction).await.unwrap();

		let patch = json!({ "theme": "dark" }).as_object().cloned().unwrap();
		service.update_settings(&mut interaction, patch).await.unwrap();

		let bundle = interaction.context.get().unwrap();
		assert_eq!(bundle.locale, Locale::Es);
		assert_eq!(bundle.settings.setting("theme"), Some(&json!("dark")));
	}

	#[tokio::test]
	async fn update_before_load_leaves_context_empty() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store.clone());
		let mut interaction = interaction(3);

		service.set_language(&mut interaction, Locale::Es).await.unwrap();
		assert!(interaction.context.get().is_none());

		let bundle = service.ensure(&mut interaction).await.unwrap();
		assert_eq!(bundle.locale, Locale::Es);
	}

	#[tokio::test]
	async fn complete_onboarding_marks_cache_and_store() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store.clone());
		let mut interaction = interaction(4);
		assert!(!service.ensure(&mut interaction).await.unwrap().settings.onboarded);

		let returned = service.complete_onboarding(&mut interaction).await.unwrap();

		let stored = store.record(UserId::new(4)).unwrap();
		let cached = &interaction.context.get().unwrap().settings;
		assert!(stored.onboarded);
		assert_eq!(cached, &stored);
		assert_eq!(returned, stored);
		assert_eq!(cached.version, stored.version);
	}

	#[tokio::test]
	async fn unrelated_patch_picks_up_language_set_elsewhere() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store);
		let mut first = interaction(5);
		let mut second = interaction(5);

		assert_eq!(service.ensure(&mut first).await.unwrap().locale, Locale::En);
		service.set_language(&mut second, Locale::Ru).await.unwrap();

		let patch = json!({ "theme": "dark" }).as_object().cloned().unwrap();
		service.update_settings(&mut first, patch).await.unwrap();

		let bundle = first.context.get().unwrap();
		assert_eq!(bundle.locale, Locale::Ru);
		assert_eq!(bundle.settings.language(), Some("ru"));
		assert_eq!(bundle.settings.setting("theme"), Some(&json!("dark")));
	}

	#[tokio::test]
	async fn writes_without_originator_fail() {
		let service = service_over(Arc::new(InMemorySettingsStore::new()));
		let mut interaction = Interaction::fresh(ChatId(1), None);

		let err = service
			.set_language(&mut interaction, Locale::Es)
			.await
			.unwrap_err();
		assert!(matches!(err, InteractionError::MissingOriginator));
		assert!(matches!(
			service.complete_onboarding(&mut interaction).await,
			Err(InteractionError::MissingOriginator)
		));
	}
}
