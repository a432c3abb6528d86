// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use parlor_server_settings::SettingsError;
use thiserror::Error;

use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum InteractionError {
	/// The event carries no user, so there is nobody to load settings for.
	#[error("interaction has no originating user")]
	MissingOriginator,

	#[error(transparent)]
	Settings(#[from] SettingsError),

	#[error("failed to deliver reply: {0}")]
	Sink(#[from] SinkError),
}

pub type Result<T> = std::result::Result<T, InteractionError>;
