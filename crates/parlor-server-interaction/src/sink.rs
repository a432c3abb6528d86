// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Outgoing messages and the transport that delivers them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interaction::{ChatId, MessageId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
	/// Opaque data echoed back in a callback interaction.
	Callback(String),
	Url(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
	pub label: String,
	pub action: ButtonAction,
}

/// Inline keyboard, row by row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
	pub rows: Vec<Vec<Button>>,
}

/// A fully rendered reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
	pub text: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub keyboard: Option<Keyboard>,
}

#[derive(Debug, Error)]
pub enum SinkError {
	#[error("message rejected by transport: {0}")]
	Rejected(String),

	#[error("transport unavailable: {0}")]
	Unavailable(String),
}

/// Delivers replies to the messaging platform.
#[async_trait]
pub trait MessageSink: Send + Sync {
	async fn send_message(
		&self,
		chat_id: ChatId,
		message: OutgoingMessage,
	) -> Result<MessageId, SinkError>;

	async fn edit_message(
		&self,
		chat_id: ChatId,
		message_id: MessageId,
		message: OutgoingMessage,
	) -> Result<(), SinkError>;
}
