// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use sqlx::sqlite::{
	SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;

use crate::error::DbError;

/// Pool size used by [`create_pool`].
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a SqlitePool with WAL mode and common settings.
///
/// # Arguments
/// * `database_url` - SQLite connection string (e.g., "sqlite:./parlor.db")
///
/// # Errors
/// Returns `DbError::Internal` if the URL is invalid or connection fails.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, DbError> {
	create_pool_with_max_connections(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Like [`create_pool`], with an explicit upper bound on open connections.
#[tracing::instrument(skip(database_url))]
pub async fn create_pool_with_max_connections(
	database_url: &str,
	max_connections: u32,
) -> Result<SqlitePool, DbError> {
	let options = SqliteConnectOptions::from_str(database_url)
		.map_err(|e| DbError::Internal(format!("Invalid database URL: {e}")))?
		.journal_mode(SqliteJournalMode::Wal)
		.synchronous(SqliteSynchronous::Normal)
		.create_if_missing(true);

	let pool = SqlitePoolOptions::new()
		.max_connections(max_connections)
		.connect_with(options)
		.await?;

	tracing::debug!("database pool created");
	Ok(pool)
}

/// Create the tables this crate reads and writes. Safe to run repeatedly.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	sqlx::query(
		r#"
		CREATE TABLE IF NOT EXISTS user_settings (
			user_id INTEGER PRIMARY KEY NOT NULL,
			onboarded INTEGER NOT NULL DEFAULT 0 CHECK (onboarded IN (0, 1)),
			settings_json TEXT,
			version INTEGER NOT NULL DEFAULT 0,
			created_at TEXT NOT NULL,
			updated_at TEXT NOT NULL
		)
		"#,
	)
	.execute(pool)
	.await?;

	tracing::debug!("database migrations applied");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_unopenable_path_fails() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("missing/dir/parlor.db").display());
		assert!(create_pool(&url).await.is_err());
	}

	#[tokio::test]
	async fn test_pool_respects_max_connections() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("parlor.db").display());
		let pool = create_pool_with_max_connections(&url, 2).await.unwrap();
		assert_eq!(pool.options().get_max_connections(), 2);
	}

	#[tokio::test]
	async fn test_file_pool_and_migrations_are_idempotent() {
		let dir = tempfile::tempdir().unwrap();
		let url = format!("sqlite:{}", dir.path().join("parlor.db").display());
		let pool = create_pool(&url).await.unwrap();

		run_migrations(&pool).await.unwrap();
		run_migrations(&pool).await.unwrap();

		let count: i64 = sqlx::query_scalar(
			"SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'user_settings'",
		)
		.fetch_one(&pool)
		.await
		.unwrap();
		assert_eq!(count, 1);
	}
}
