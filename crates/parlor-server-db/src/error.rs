// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	/// Driver or transport failure (I/O, pool exhaustion, locked database).
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// The table backing the store does not exist yet.
	#[error("Relation missing: {0}")]
	RelationMissing(String),

	/// A row with the same key already exists.
	#[error("Conflict: {0}")]
	Conflict(String),

	/// The write violated a constraint other than uniqueness.
	#[error("Constraint violation: {0}")]
	Rejected(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl DbError {
	pub fn is_relation_missing(&self) -> bool {
		matches!(self, DbError::RelationMissing(_))
	}

	pub fn is_conflict(&self) -> bool {
		matches!(self, DbError::Conflict(_))
	}

	/// True when a stored row could not be decoded.
	pub fn is_corrupt(&self) -> bool {
		matches!(self, DbError::Internal(_) | DbError::Serialization(_))
	}

	/// True for failures of the connection rather than of the statement.
	pub fn is_transport(&self) -> bool {
		matches!(self, DbError::Sqlx(_))
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
