// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use parlor_server_db::UserId;
use serde::{Deserialize, Serialize};

use crate::context::RenderContext;

/// Conversation a reply is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl fmt::Display for ChatId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The platform user who triggered an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Originator {
	pub id: UserId,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub username: Option<String>,
	/// Client language as reported by the platform.
	pub language_code: Option<String>,
}

impl Originator {
	pub fn new(id: UserId) -> Self {
		Self {
			id,
			first_name: None,
			last_name: None,
			username: None,
			language_code: None,
		}
	}

	pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
		self.first_name = Some(first_name.into());
		self
	}

	pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
		self.last_name = Some(last_name.into());
		self
	}

	pub fn with_username(mut self, username: impl Into<String>) -> Self {
		self.username = Some(username.into());
		self
	}

	pub fn with_language_code(mut self, code: impl Into<String>) -> Self {
		self.language_code = Some(code.into());
		self
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
	/// A new message from the user.
	Fresh,
	/// A button press on a message the bot sent earlier.
	Callback { message_id: MessageId, data: String },
}

/// One inbound event and the state derived for it while it is handled.
///
/// The render context lives exactly as long as the interaction.
#[derive(Debug, Clone)]
pub struct Interaction {
	pub originator: Option<Originator>,
	pub chat_id: ChatId,
	pub kind: InteractionKind,
	pub context: RenderContext,
}

impl Interaction {
	pub fn fresh(chat_id: ChatId, originator: Option<Originator>) -> Self {
		Self {
			originator,
			chat_id,
			kind: InteractionKind::Fresh,
			context: RenderContext::default(),
		}
	}

	pub fn callback(
		chat_id: ChatId,
		message_id: MessageId,
		data: impl Into<String>,
		originator: Option<Originator>,
	) -> Self {
		Self {
			originator,
			chat_id,
			kind: InteractionKind::Callback {
				message_id,
				data: data.into(),
			},
			context: RenderContext::default(),
		}
	}

	pub fn user_id(&self) -> Option<UserId> {
		self.originator.as_ref().map(|o| o.id)
	}

	/// The message a callback was pressed on, if any.
	pub fn source_message(&self) -> Option<MessageId> {
		match &self.kind {
			InteractionKind::Callback { message_id, .. } => Some(*message_id),
			InteractionKind::Fresh => None,
		}
	}

	pub fn callback_data(&self) -> Option<&str> {
		match &self.kind {
			InteractionKind::Callback { data, .. } => Some(data.as_str()),
			InteractionKind::Fresh => None,
		}
	}
}
