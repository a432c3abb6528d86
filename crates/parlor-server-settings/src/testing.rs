// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory [`SettingsStore`] with call counters and scripted races.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parlor_server_db::{DbError, SettingsRecord, SettingsStore, UserId};
use serde_json::{Map, Value};

use crate::service::merge_settings;

#[derive(Default)]
pub struct InMemorySettingsStore {
	rows: Mutex<HashMap<UserId, SettingsRecord>>,
	delay: Option<Duration>,
	relation_missing: AtomicBool,
	failures: Mutex<VecDeque<DbError>>,
	insert_failure: Mutex<Option<DbError>>,
	insert_race: Mutex<Option<Map<String, Value>>>,
	update_race: Mutex<Option<(usize, Map<String, Value>)>>,
	selects: AtomicUsize,
	inserts: AtomicUsize,
	updates: AtomicUsize,
}

impl InMemorySettingsStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sleep before answering every call.
	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn with_record(self, record: SettingsRecord) -> Self {
		self.rows.lock().unwrap().insert(record.user_id, record);
		self
	}

	/// While set, reads fail as if the table did not exist.
	pub fn set_relation_missing(&self, missing: bool) {
		self.relation_missing.store(missing, Ordering::SeqCst);
	}

	/// Fail the next call, whatever it is.
	pub fn fail_next(&self, err: DbError) {
		self.failures.lock().unwrap().push_back(err);
	}

	pub fn fail_insert(&self, err: DbError) {
		*self.insert_failure.lock().unwrap() = Some(err);
	}

	/// The next insert loses to another writer that stores `settings` first.
	pub fn race_next_insert(&self, settings: Map<String, Value>) {
		*self.insert_race.lock().unwrap() = Some(settings);
	}

	/// The next `times` updates lose to another writer that merges `patch`.
	pub fn race_next_updates(&self, times: usize, patch: Map<String, Value>) {
		*self.update_race.lock().unwrap() = Some((times, patch));
	}

	pub fn select_calls(&self) -> usize {
		self.selects.load(Ordering::SeqCst)
	}

	pub fn insert_calls(&self) -> usize {
		self.inserts.load(Ordering::SeqCst)
	}

	pub fn update_calls(&self) -> usize {
		self.updates.load(Ordering::SeqCst)
	}

	pub fn row_count(&self) -> usize {
		self.rows.lock().unwrap().len()
	}

	pub fn record(&self, user_id: UserId) -> Option<SettingsRecord> {
		self.rows.lock().unwrap().get(&user_id).cloned()
	}

	async fn before_call(&self) -> Result<(), DbError> {
		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		match self.failures.lock().unwrap().pop_front() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}

	fn take_update_race(&self) -> Option<Map<String, Value>> {
		let mut race = self.update_race.lock().unwrap();
		let (remaining, patch) = race.as_mut()?;
		if *remaining == 0 {
			return None;
		}
		*remaining -= 1;
		Some(patch.clone())
	}
}

#[async_trait]
impl SettingsStore for InMemorySettingsStore {
	async fn select_by_id(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		self.selects.fetch_add(1, Ordering::SeqCst);
		self.before_call().await?;
		if self.relation_missing.load(Ordering::SeqCst) {
			return Err(DbError::RelationMissing("user_settings".to_string()));
		}
		Ok(self.record(user_id))
	}

	async fn insert(&self, record: &SettingsRecord) -> Result<SettingsRecord, DbError> {
		self.inserts.fetch_add(1, Ordering::SeqCst);
		self.before_call().await?;
		if let Some(err) = self.insert_failure.lock().unwrap().take() {
			return Err(err);
		}
		// Creating the row also creates the relation.
		self.relation_missing.store(false, Ordering::SeqCst);

		let mut rows = self.rows.lock().unwrap();
		if let Some(settings) = self.insert_race.lock().unwrap().take() {
			let mut winner = SettingsRecord::new(record.user_id);
			winner.settings_json = Some(settings);
			rows.insert(record.user_id, winner);
		}
		if rows.contains_key(&record.user_id) {
			return Err(DbError::Conflict(format!("user {} already has settings", record.user_id)));
		}
		rows.insert(record.user_id, record.clone());
		Ok(record.clone())
	}

	async fn update_settings(
		&self,
		user_id: UserId,
		settings: &Map<String, Value>,
		expected_version: i64,
	) -> Result<Option<SettingsRecord>, DbError> {
		self.updates.fetch_add(1, Ordering::SeqCst);
		self.before_call().await?;

		let race = self.take_update_race();
		let mut rows = self.rows.lock().unwrap();
		let Some(row) = rows.get_mut(&user_id) else {
			return Ok(None);
		};
		if let Some(patch) = race {
			row.settings_json = Some(merge_settings(row.settings_json.as_ref(), &patch));
			row.version += 1;
		}
		if row.version != expected_version {
			return Ok(None);
		}
		row.settings_json = Some(settings.clone());
		row.version += 1;
		row.updated_at = Utc::now();
		Ok(Some(row.clone()))
	}

	async fn mark_onboarded(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		self.before_call().await?;
		let mut rows = self.rows.lock().unwrap();
		let Some(row) = rows.get_mut(&user_id) else {
			return Ok(None);
		};
		row.onboarded = true;
		row.version += 1;
		row.updated_at = Utc::now();
		Ok(Some(row.clone()))
	}
}
