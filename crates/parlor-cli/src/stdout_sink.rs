// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use parlor_server_interaction::{
	ButtonAction, ChatId, MessageId, MessageSink, OutgoingMessage, SinkError,
};

/// Prints rendered replies instead of delivering them.
#[derive(Debug, Default)]
pub struct StdoutSink {
	next_id: AtomicI64,
}

#[async_trait]
impl MessageSink for StdoutSink {
	async fn send_message(
		&self,
		chat_id: ChatId,
		message: OutgoingMessage,
	) -> Result<MessageId, SinkError> {
		let id = MessageId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
		tracing::debug!(%chat_id, message_id = %id, "printing message");
		println!("{}", format_message(&message));
		Ok(id)
	}

	async fn edit_message(
		&self,
		chat_id: ChatId,
		message_id: MessageId,
		message: OutgoingMessage,
	) -> Result<(), SinkError> {
		tracing::debug!(%chat_id, %message_id, "printing edited message");
		println!("{}", format_message(&message));
		Ok(())
	}
}

pub fn format_message(message: &OutgoingMessage) -> String {
	let mut out = message.text.clone();
	let Some(keyboard) = &message.keyboard else {
		return out;
	};
	for row in &keyboard.rows {
		out.push('\n');
		let cells: Vec<String> = row
			.iter()
			.map(|button| match &button.action {
				ButtonAction::Callback(data) => format!("[{}] ({data})", button.label),
				ButtonAction::Url(url) => format!("[{}] <{url}>", button.label),
			})
			.collect();
		out.push_str(&cells.join(" "));
	}
	out
}
