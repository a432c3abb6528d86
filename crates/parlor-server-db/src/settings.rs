// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User settings repository.
//!
//! Row-level access to the `user_settings` table. Higher-level semantics
//! (get-or-create, merge-patch) live in `parlor-server-settings`; this layer
//! only selects, inserts and updates single rows and reports failures as
//! typed [`DbError`] kinds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{error::ErrorKind, sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::types::{SettingsRecord, UserId};

pub const SETTINGS_TABLE: &str = "user_settings";

#[async_trait]
pub trait SettingsStore: Send + Sync {
	async fn select_by_id(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError>;

	/// Insert a new row. Fails with [`DbError::Conflict`] if one exists.
	async fn insert(&self, record: &SettingsRecord) -> Result<SettingsRecord, DbError>;

	/// Replace the settings bag if the row is still at `expected_version`.
	///
	/// Returns `None` when no row matched, i.e. the row is missing or another
	/// writer got there first.
	async fn update_settings(
		&self,
		user_id: UserId,
		settings: &Map<String, Value>,
		expected_version: i64,
	) -> Result<Option<SettingsRecord>, DbError>;

	/// Set `onboarded` and return the updated row, or `None` if the row
	/// does not exist.
	async fn mark_onboarded(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError>;
}

/// SQLite-backed [`SettingsStore`].
#[derive(Clone)]
pub struct SettingsRepository {
	pool: SqlitePool,
}

impl SettingsRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get the settings row for a user.
	///
	/// # Returns
	/// `None` if the user has no row yet.
	///
	/// # Errors
	/// `DbError::RelationMissing` if the table has not been created.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn select_by_id(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT user_id, onboarded, settings_json, version, created_at, updated_at
			FROM user_settings
			WHERE user_id = ?
			"#,
		)
		.bind(user_id.into_inner())
		.fetch_optional(&self.pool)
		.await;

		match row {
			Ok(row) => row.map(|r| self.row_to_record(&r)).transpose(),
			Err(e) => Err(self.classify(e).await),
		}
	}

	/// Insert a settings row.
	///
	/// # Errors
	/// - `DbError::Conflict` if a row for this user already exists
	/// - `DbError::Rejected` for any other constraint violation
	#[tracing::instrument(skip(self, record), fields(user_id = %record.user_id))]
	pub async fn insert(&self, record: &SettingsRecord) -> Result<SettingsRecord, DbError> {
		let settings_json = record
			.settings_json
			.as_ref()
			.map(serde_json::to_string)
			.transpose()?;

		let result = sqlx::query(
			r#"
			INSERT INTO user_settings (user_id, onboarded, settings_json, version, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(record.user_id.into_inner())
		.bind(record.onboarded as i32)
		.bind(settings_json)
		.bind(record.version)
		.bind(record.created_at.to_rfc3339())
		.bind(record.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await;

		if let Err(e) = result {
			return Err(self.classify(e).await);
		}

		tracing::debug!(user_id = %record.user_id, "settings row inserted");
		self
			.select_by_id(record.user_id)
			.await?
			.ok_or_else(|| DbError::Internal("settings row missing after insert".to_string()))
	}

	/// Compare-and-swap update of the settings bag.
	#[tracing::instrument(skip(self, settings), fields(user_id = %user_id))]
	pub async fn update_settings(
		&self,
		user_id: UserId,
		settings: &Map<String, Value>,
		expected_version: i64,
	) -> Result<Option<SettingsRecord>, DbError> {
		let settings_json = serde_json::to_string(settings)?;
		let now = Utc::now().to_rfc3339();

		let result = sqlx::query(
			r#"
			UPDATE user_settings
			SET settings_json = ?, version = version + 1, updated_at = ?
			WHERE user_id = ? AND version = ?
			"#,
		)
		.bind(settings_json)
		.bind(now)
		.bind(user_id.into_inner())
		.bind(expected_version)
		.execute(&self.pool)
		.await;

		let rows = match result {
			Ok(done) => done.rows_affected(),
			Err(e) => return Err(self.classify(e).await),
		};

		if rows == 0 {
			tracing::debug!(user_id = %user_id, expected_version, "settings update matched no row");
			return Ok(None);
		}

		self.select_by_id(user_id).await
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn mark_onboarded(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		let now = Utc::now().to_rfc3339();
		let result = sqlx::query(
			r#"
			UPDATE user_settings
			SET onboarded = 1, version = version + 1, updated_at = ?
			WHERE user_id = ?
			"#,
		)
		.bind(now)
		.bind(user_id.into_inner())
		.execute(&self.pool)
		.await;

		match result {
			Ok(done) if done.rows_affected() == 0 => Ok(None),
			Ok(_) => self.select_by_id(user_id).await,
			Err(e) => Err(self.classify(e).await),
		}
	}

	// =========================================================================
	// Helpers
	// =========================================================================

	async fn table_exists(&self) -> Result<bool, sqlx::Error> {
		let count: i64 =
			sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
				.bind(SETTINGS_TABLE)
				.fetch_one(&self.pool)
				.await?;
		Ok(count > 0)
	}

	/// Map a driver error onto the store's error kinds.
	///
	/// Constraint violations are classified by the driver's error kind. A
	/// generic statement failure is reported as `RelationMissing` only when
	/// the catalog confirms the table is absent.
	async fn classify(&self, err: sqlx::Error) -> DbError {
		if let sqlx::Error::Database(db_err) = &err {
			match db_err.kind() {
				ErrorKind::UniqueViolation => return DbError::Conflict(db_err.message().to_string()),
				ErrorKind::ForeignKeyViolation
				| ErrorKind::NotNullViolation
				| ErrorKind::CheckViolation => return DbError::Rejected(db_err.message().to_string()),
				_ => {}
			}

			match self.table_exists().await {
				Ok(false) => return DbError::RelationMissing(SETTINGS_TABLE.to_string()),
				Ok(true) => {}
				Err(lookup) => tracing::debug!(error = %lookup, "sqlite_master lookup failed"),
			}
		}
		DbError::Sqlx(err)
	}

	fn row_to_record(&self, row: &sqlx::sqlite::SqliteRow) -> Result<SettingsRecord, DbError> {
		let user_id: i64 = row.get("user_id");
		let onboarded: i64 = row.get("onboarded");
		let settings_json: Option<String> = row.get("settings_json");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		let settings_json = match settings_json {
			Some(raw) => match serde_json::from_str::<Value>(&raw)? {
				Value::Object(map) => Some(map),
				Value::Null => None,
				other => {
					return Err(DbError::Internal(format!(
						"settings_json for user {user_id} is not an object: {other}"
					)))
				}
			},
			None => None,
		};

		Ok(SettingsRecord {
			user_id: UserId::new(user_id),
			onboarded: onboarded != 0,
			settings_json,
			version: row.get("version"),
			created_at: parse_timestamp(&created_at, "created_at")?,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		})
	}
}

fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	DateTime::parse_from_rfc3339(value)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

#[async_trait]
impl SettingsStore for SettingsRepository {
	async fn select_by_id(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		self.select_by_id(user_id).await
	}

	async fn insert(&self, record: &SettingsRecord) -> Result<SettingsRecord, DbError> {
		self.insert(record).await
	}

	async fn update_settings(
		&self,
		user_id: UserId,
		settings: &Map<String, Value>,
		expected_version: i64,
	) -> Result<Option<SettingsRecord>, DbError> {
		self
			.update_settings(user_id, settings, expected_version)
			.await
	}

	async fn mark_onboarded(&self, user_id: UserId) -> Result<Option<SettingsRecord>, DbError> {
		self.mark_onboarded(user_id).await
	}
}
