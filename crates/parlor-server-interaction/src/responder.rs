// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::error::Result;
use crate::interaction::{Interaction, MessageId};
use crate::loader::ContextLoader;
use crate::render::MessageTemplate;
use crate::sink::MessageSink;

/// Renders templates in the interaction's locale and delivers them.
#[derive(Clone)]
pub struct Responder {
	loader: ContextLoader,
}

impl Responder {
	pub fn new(loader: ContextLoader) -> Self {
		Self { loader }
	}

	/// Edits the message a callback came from; sends a new one otherwise.
	#[tracing::instrument(skip_all, fields(chat_id = %interaction.chat_id))]
	pub async fn respond(
		&self,
		interaction: &mut Interaction,
		sink: &dyn MessageSink,
		template: &MessageTemplate,
	) -> Result<MessageId> {
		let locale = self.loader.ensure(interaction).await?.locale;
		let message = template.render(locale);

		match interaction.source_message() {
			Some(message_id) => {
				sink.edit_message(interaction.chat_id, message_id, message)
					.await?;
				Ok(message_id)
			}
			None => Ok(sink.send_message(interaction.chat_id, message).await?),
		}
	}
}
