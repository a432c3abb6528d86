// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Get-or-create and merge-patch on top of a [`SettingsStore`].

use std::future::Future;
use std::sync::Arc;

use parlor_server_config::StoreConfig;
use parlor_server_db::{DbError, SettingsRecord, SettingsStore, UserId};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{SettingsError, SettingsResult};

#[derive(Clone)]
pub struct SettingsService {
	store: Arc<dyn SettingsStore>,
	config: StoreConfig,
}

impl SettingsService {
	pub fn new(store: Arc<dyn SettingsStore>, config: StoreConfig) -> Self {
		Self { store, config }
	}

	/// Return the user's record, inserting an empty one on first contact.
	///
	/// A missing table counts as a missing row. When a concurrent caller
	/// inserts first, its row is returned.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_or_create(&self, user_id: UserId) -> SettingsResult<SettingsRecord> {
		if let Some(existing) = self.find(user_id).await? {
			debug!("settings record found");
			return Ok(existing);
		}

		let fresh = SettingsRecord::new(user_id);
		match self
			.bounded(user_id, "creating settings", self.store.insert(&fresh))
			.await?
		{
			Ok(created) => {
				info!(user_id = %user_id, "created settings record");
				Ok(created)
			}
			Err(e) if e.is_conflict() => {
				warn!(user_id = %user_id, "settings record created concurrently, re-reading");
				self.find(user_id).await?.ok_or_else(|| {
					SettingsError::rejected(
						user_id,
						"creating settings",
						"insert conflicted but no row is visible",
					)
				})
			}
			Err(e) => Err(SettingsError::from_write(user_id, "creating settings", e)),
		}
	}

	/// Shallow-merge `patch` into the stored settings bag.
	///
	/// Writes are compare-and-swap on the record version. A lost race re-reads
	/// and retries up to `patch_retries` times.
	#[tracing::instrument(skip(self, patch), fields(user_id = %user_id, keys = patch.len()))]
	pub async fn merge_patch(
		&self,
		user_id: UserId,
		patch: Map<String, Value>,
	) -> SettingsResult<SettingsRecord> {
		let mut current = self.get_or_create(user_id).await?;
		let attempts = self.config.patch_retries.saturating_add(1);

		for attempt in 1..=attempts {
			let merged = merge_settings(current.settings_json.as_ref(), &patch);
			let write = self.store.update_settings(user_id, &merged, current.version);
			match self.bounded(user_id, "updating settings", write).await? {
				Ok(Some(updated)) => {
					debug!(version = updated.version, "settings updated");
					return Ok(updated);
				}
				Ok(None) => {
					warn!(
						user_id = %user_id,
						attempt,
						expected_version = current.version,
						"settings changed concurrently, retrying merge"
					);
					current = self.get_or_create(user_id).await?;
				}
				Err(e) => return Err(SettingsError::from_write(user_id, "updating settings", e)),
			}
		}

		Err(SettingsError::rejected(
			user_id,
			"updating settings",
			format!("still conflicting after {attempts} attempts"),
		))
	}

	/// Mark the user as onboarded and return the stored record. Idempotent;
	/// creates the record if needed.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn set_onboarded(&self, user_id: UserId) -> SettingsResult<SettingsRecord> {
		if let Some(updated) = self.mark_onboarded(user_id).await? {
			return Ok(updated);
		}

		self.get_or_create(user_id).await?;
		self.mark_onboarded(user_id).await?.ok_or_else(|| {
			SettingsError::rejected(user_id, "marking onboarded", "no settings row to update")
		})
	}

	// ===== Helpers =====

	async fn find(&self, user_id: UserId) -> SettingsResult<Option<SettingsRecord>> {
		match self
			.bounded(user_id, "reading settings", self.store.select_by_id(user_id))
			.await?
		{
			Ok(found) => Ok(found),
			Err(e) if e.is_relation_missing() => {
				debug!(error = %e, "settings relation missing, treating as absent");
				Ok(None)
			}
			Err(e) => Err(SettingsError::from_read(user_id, "reading settings", e)),
		}
	}

	async fn mark_onboarded(&self, user_id: UserId) -> SettingsResult<Option<SettingsRecord>> {
		self.bounded(user_id, "marking onboarded", self.store.mark_onboarded(user_id))
			.await?
			.map_err(|e| SettingsError::from_write(user_id, "marking onboarded", e))
	}

	/// Run one store call under the configured timeout. The outer error is
	/// the timeout; the inner result is left for the caller to classify.
	async fn bounded<T, F>(
		&self,
		user_id: UserId,
		action: &'static str,
		call: F,
	) -> SettingsResult<Result<T, DbError>>
	where
		F: Future<Output = Result<T, DbError>>,
	{
		let limit = self.config.timeout();
		tokio::time::timeout(limit, call).await.map_err(|_| {
			warn!(user_id = %user_id, action, timeout_ms = self.config.timeout_ms, "settings store call timed out");
			SettingsError::timed_out(user_id, action, limit)
		})
	}
}

/// Shallow merge: absent settings are an empty map and patch keys win.
pub fn merge_settings(
	existing: Option<&Map<String, Value>>,
	patch: &Map<String, Value>,
) -> Map<String, Value> {
	let mut merged = existing.cloned().unwrap_or_default();
	for (key, value) in patch {
		merged.insert(key.clone(), value.clone());
	}
	merged
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::InMemorySettingsStore;
	use proptest::prelude::*;
	use serde_json::json;
	use std::time::Duration;

	fn map(value: Value) -> Map<String, Value> {
		value.as_object().cloned().unwrap()
	}

	fn service_over(store: Arc<InMemorySettingsStore>) -> SettingsService {
		SettingsService::new(store, StoreConfig::default())
	}

	#[tokio::test]
	async fn test_get_or_create_inserts_once() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store.clone());
		let user = UserId::new(100);

		let first = service.get_or_create(user).await.unwrap();
		let second = service.get_or_create(user).await.unwrap();

		assert_eq!(first, second);
		assert!(!first.onboarded);
		assert!(first.settings_json.is_none());
		assert_eq!(store.insert_calls(), 1);
	}

	#[tokio::test]
	async fn test_get_or_create_treats_missing_relation_as_absent() {
		let store = Arc::new(InMemorySettingsStore::new());
		store.set_relation_missing(true);
		let service = service_over(store.clone());

		let record = service.get_or_create(UserId::new(5)).await.unwrap();
		assert_eq!(record.user_id, UserId::new(5));
		assert_eq!(store.insert_calls(), 1);
	}

	#[tokio::test]
	async fn test_get_or_create_returns_concurrent_winner_on_conflict() {
		let store = Arc::new(InMemorySettingsStore::new());
		let winner = map(json!({ "language": "ru" }));
		store.race_next_insert(winner.clone());
		let service = service_over(store.clone());

		let record = service.get_or_create(UserId::new(8)).await.unwrap();
		assert_eq!(record.settings_json, Some(winner));
		assert_eq!(store.row_count(), 1);
	}

	#[tokio::test]
	async fn test_read_failure_is_store_unavailable() {
		let store = Arc::new(InMemorySettingsStore::new());
		store.fail_next(DbError::Sqlx(sqlx::Error::PoolTimedOut));
		let service = service_over(store.clone());

		let err = service.get_or_create(UserId::new(1)).await.unwrap_err();
		assert!(err.is_unavailable());
		assert_eq!(store.insert_calls(), 0);
	}

	#[tokio::test]
	async fn test_insert_rejection_is_write_rejected() {
		let store = Arc::new(InMemorySettingsStore::new());
		store.fail_insert(DbError::Rejected("NOT NULL constraint failed".to_string()));
		let service = service_over(store);

		let err = service.get_or_create(UserId::new(1)).await.unwrap_err();
		assert!(matches!(err, SettingsError::WriteRejected { .. }));
	}

	#[tokio::test]
	async fn test_merge_patch_accumulates_keys() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store);
		let user = UserId::new(3);

		service.merge_patch(user, map(json!({ "a": 1 }))).await.unwrap();
		let record = service.merge_patch(user, map(json!({ "b": 2 }))).await.unwrap();

		assert_eq!(record.settings_json, Some(map(json!({ "a": 1, "b": 2 }))));
		assert_eq!(record.version, 2);
	}

	#[tokio::test]
	async fn test_merge_patch_overwrites_existing_key() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store);
		let user = UserId::new(3);

		service
			.merge_patch(user, map(json!({ "language": "en", "theme": "dark" })))
			.await
			.unwrap();
		let record = service
			.merge_patch(user, map(json!({ "language": "es" })))
			.await
			.unwrap();

		assert_eq!(record.language(), Some("es"));
		assert_eq!(record.setting("theme"), Some(&json!("dark")));
	}

	#[tokio::test]
	async fn test_merge_patch_retries_after_concurrent_write() {
		let store = Arc::new(InMemorySettingsStore::new());
		store.race_next_updates(2, map(json!({ "theme": "dark" })));
		let service = service_over(store.clone());
		let user = UserId::new(4);

		let record = service
			.merge_patch(user, map(json!({ "language": "es" })))
			.await
			.unwrap();

		assert_eq!(
			record.settings_json,
			Some(map(json!({ "language": "es", "theme": "dark" })))
		);
		assert_eq!(store.update_calls(), 3);
	}

	#[tokio::test]
	async fn test_merge_patch_gives_up_after_retries() {
		let store = Arc::new(InMemorySettingsStore::new());
		store.race_next_updates(10, map(json!({ "theme": "dark" })));
		let config = StoreConfig {
			patch_retries: 1,
			..Default::default()
		};
		let service = SettingsService::new(store.clone(), config);

		let err = service
			.merge_patch(UserId::new(4), map(json!({ "language": "es" })))
			.await
			.unwrap_err();

		assert!(matches!(err, SettingsError::WriteRejected { .. }));
		assert!(err.to_string().contains("2 attempts"));
		assert_eq!(store.update_calls(), 2);
	}

	#[tokio::test]
	async fn test_set_onboarded_creates_and_is_idempotent() {
		let store = Arc::new(InMemorySettingsStore::new());
		let service = service_over(store.clone());
		let user = UserId::new(11);

		let first = service.set_onboarded(user).await.unwrap();
		let second = service.set_onboarded(user).await.unwrap();

		assert!(first.onboarded && second.onboarded);
		assert_eq!(second.version, first.version + 1);
		assert_eq!(service.get_or_create(user).await.unwrap(), second);
		assert_eq!(store.insert_calls(), 1);
	}

	#[tokio::test]
	async fn test_slow_store_times_out() {
		let store = Arc::new(InMemorySettingsStore::new().with_delay(Duration::from_millis(200)));
		let config = StoreConfig {
			timeout_ms: 20,
			..Default::default()
		};
		let service = SettingsService::new(store, config);

		let err = service.get_or_create(UserId::new(1)).await.unwrap_err();
		assert!(err.is_unavailable());
		assert!(err.to_string().contains("no response within 20ms"));
	}

	#[tokio::test]
	async fn test_against_sqlite_repository() {
		let pool = parlor_server_db::testing::create_settings_test_pool().await;
		let repo = Arc::new(parlor_server_db::SettingsRepository::new(pool));
		let service = SettingsService::new(repo, StoreConfig::default());
		let user = UserId::new(77);

		let created = service.get_or_create(user).await.unwrap();
		assert_eq!(created.version, 0);

		service.merge_patch(user, map(json!({ "a": 1 }))).await.unwrap();
		let record = service.merge_patch(user, map(json!({ "b": 2 }))).await.unwrap();
		assert_eq!(record.settings_json, Some(map(json!({ "a": 1, "b": 2 }))));

		let onboarded = service.set_onboarded(user).await.unwrap();
		assert!(onboarded.onboarded);
		assert_eq!(onboarded.settings_json, record.settings_json);
		assert_eq!(service.get_or_create(user).await.unwrap(), onboarded);
	}

	#[tokio::test]
	async fn test_undecodable_row_is_corrupt_not_unavailable() {
		let pool = parlor_server_db::testing::create_settings_test_pool().await;
		let repo = Arc::new(parlor_server_db::SettingsRepository::new(pool.clone()));
		let service = SettingsService::new(repo, StoreConfig::default());
		let user = UserId::new(78);

		service.get_or_create(user).await.unwrap();
		sqlx::query("UPDATE user_settings SET settings_json = '[1,2]' WHERE user_id = 78")
			.execute(&pool)
			.await
			.unwrap();

		let err = service.get_or_create(user).await.unwrap_err();
		assert!(matches!(err, SettingsError::CorruptRecord { .. }));
		assert!(!err.is_unavailable());
	}

	#[test]
	fn test_merge_settings_treats_none_as_empty() {
		let patch = map(json!({ "language": "ru" }));
		assert_eq!(merge_settings(None, &patch), patch);
	}

	proptest! {
		#[test]
		fn merged_map_contains_every_patch_key(
			existing in proptest::collection::btree_map("[a-d]", 0i64..100, 0..4),
			patch in proptest::collection::btree_map("[a-d]", 0i64..100, 0..4),
		) {
			let existing: Map<String, Value> = existing.into_iter().map(|(k, v)| (k, json!(v))).collect();
			let patch: Map<String, Value> = patch.into_iter().map(|(k, v)| (k, json!(v))).collect();

			let merged = merge_settings(Some(&existing), &patch);
			for (key, value) in &patch {
				prop_assert_eq!(merged.get(key), Some(value));
			}
			for (key, value) in &existing {
				if !patch.contains_key(key) {
					prop_assert_eq!(merged.get(key), Some(value));
				}
			}
		}
	}
}
