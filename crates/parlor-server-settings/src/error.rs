// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::time::Duration;

use parlor_server_db::{DbError, UserId};
use thiserror::Error;

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Failures surfaced by the settings service.
///
/// A missing row is never an error: it is created on demand.
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The store could not be reached or did not answer in time.
	#[error("settings store unavailable while {action} for user {user_id}: {message}")]
	StoreUnavailable {
		user_id: UserId,
		action: &'static str,
		message: String,
		#[source]
		source: Option<DbError>,
	},

	/// The stored row exists but could not be decoded.
	#[error("settings record for user {user_id} is corrupt: {message}")]
	CorruptRecord {
		user_id: UserId,
		message: String,
		#[source]
		source: DbError,
	},

	/// The store refused a write.
	#[error("settings write rejected while {action} for user {user_id}: {message}")]
	WriteRejected {
		user_id: UserId,
		action: &'static str,
		message: String,
		#[source]
		source: Option<DbError>,
	},
}

impl SettingsError {
	pub(crate) fn unavailable(user_id: UserId, action: &'static str, err: DbError) -> Self {
		Self::StoreUnavailable {
			user_id,
			action,
			message: err.to_string(),
			source: Some(err),
		}
	}

	/// Reads fail as `CorruptRecord` when the row could not be decoded and
	/// as `StoreUnavailable` otherwise.
	pub(crate) fn from_read(user_id: UserId, action: &'static str, err: DbError) -> Self {
		if err.is_corrupt() {
			return Self::CorruptRecord {
				user_id,
				message: err.to_string(),
				source: err,
			};
		}
		Self::unavailable(user_id, action, err)
	}

	pub(crate) fn timed_out(user_id: UserId, action: &'static str, after: Duration) -> Self {
		Self::StoreUnavailable {
			user_id,
			action,
			message: format!("no response within {}ms", after.as_millis()),
			source: None,
		}
	}

	/// Transport failures stay `StoreUnavailable`; anything the store
	/// actively refused becomes `WriteRejected`.
	pub(crate) fn from_write(user_id: UserId, action: &'static str, err: DbError) -> Self {
		if err.is_transport() {
			return Self::unavailable(user_id, action, err);
		}
		Self::WriteRejected {
			user_id,
			action,
			message: err.to_string(),
			source: Some(err),
		}
	}

	pub(crate) fn rejected(user_id: UserId, action: &'static str, message: impl Into<String>) -> Self {
		Self::WriteRejected {
			user_id,
			action,
			message: message.into(),
			source: None,
		}
	}

	pub fn user_id(&self) -> UserId {
		match self {
			Self::StoreUnavailable { user_id, .. }
			| Self::CorruptRecord { user_id, .. }
			| Self::WriteRejected { user_id, .. } => *user_id,
		}
	}

	pub fn is_unavailable(&self) -> bool {
		matches!(self, Self::StoreUnavailable { .. })
	}
}
