// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::interaction::{ChatId, MessageId};
use crate::sink::{MessageSink, OutgoingMessage, SinkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
	Sent {
		chat_id: ChatId,
		message: OutgoingMessage,
	},
	Edited {
		chat_id: ChatId,
		message_id: MessageId,
		message: OutgoingMessage,
	},
}

/// Records every delivery. Sent messages get ids 1, 2, 3...
#[derive(Debug, Default)]
pub struct RecordingSink {
	calls: Mutex<Vec<SinkCall>>,
	failures: Mutex<VecDeque<SinkError>>,
}

impl RecordingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fail_next(&self, err: SinkError) {
		self.failures.lock().unwrap().push_back(err);
	}

	pub fn calls(&self) -> Vec<SinkCall> {
		self.calls.lock().unwrap().clone()
	}

	fn take_failure(&self) -> Result<(), SinkError> {
		match self.failures.lock().unwrap().pop_front() {
			Some(err) => Err(err),
			None => Ok(()),
		}
	}
}

#[async_trait]
impl MessageSink for RecordingSink {
	async fn send_message(
		&self,
		chat_id: ChatId,
		message: OutgoingMessage,
	) -> Result<MessageId, SinkError> {
		self.take_failure()?;
		let mut calls = self.calls.lock().unwrap();
		let sent = calls
			.iter()
			.filter(|call| matches!(call, SinkCall::Sent { .. }))
			.count();
		calls.push(SinkCall::Sent { chat_id, message });
		Ok(MessageId(sent as i64 + 1))
	}

	async fn edit_message(
		&self,
		chat_id: ChatId,
		message_id: MessageId,
		message: OutgoingMessage,
	) -> Result<(), SinkError> {
		self.take_failure()?;
		self.calls.lock().unwrap().push(SinkCall::Edited {
			chat_id,
			message_id,
			message,
		});
		Ok(())
	}
}
