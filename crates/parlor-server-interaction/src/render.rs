// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Locale-independent message templates.

use parlor_common_i18n::{t_fmt, Locale, Params};

use crate::sink::{Button, ButtonAction, Keyboard, OutgoingMessage};

/// Text that is either looked up in the catalog or sent as-is.
#[derive(Debug, Clone)]
pub enum Text {
	Key { key: String, params: Params },
	Raw(String),
}

impl Text {
	pub fn key(key: impl Into<String>) -> Self {
		Self::Key {
			key: key.into(),
			params: Params::new(),
		}
	}

	pub fn key_with(key: impl Into<String>, params: Params) -> Self {
		Self::Key {
			key: key.into(),
			params,
		}
	}

	pub fn raw(text: impl Into<String>) -> Self {
		Self::Raw(text.into())
	}

	pub fn render(&self, locale: Locale) -> String {
		match self {
			Self::Key { key, params } => t_fmt(locale, key, params),
			Self::Raw(text) => text.clone(),
		}
	}
}

#[derive(Debug, Clone)]
pub struct ButtonTemplate {
	pub label: Text,
	pub action: ButtonAction,
}

impl ButtonTemplate {
	pub fn callback(label: Text, data: impl Into<String>) -> Self {
		Self {
			label,
			action: ButtonAction::Callback(data.into()),
		}
	}

	pub fn url(label: Text, url: impl Into<String>) -> Self {
		Self {
			label,
			action: ButtonAction::Url(url.into()),
		}
	}
}

/// A reply before a locale is chosen.
#[derive(Debug, Clone)]
pub struct MessageTemplate {
	pub text: Text,
	pub rows: Vec<Vec<ButtonTemplate>>,
}

impl MessageTemplate {
	pub fn new(text: Text) -> Self {
		Self {
			text,
			rows: Vec::new(),
		}
	}

	pub fn row(mut self, buttons: Vec<ButtonTemplate>) -> Self {
		self.rows.push(buttons);
		self
	}

	pub fn render(&self, locale: Locale) -> OutgoingMessage {
		let rows: Vec<Vec<Button>> = self
			.rows
			.iter()
			.filter(|row| !row.is_empty())
			.map(|row| {
				row.iter()
					.map(|button| Button {
						label: button.label.render(locale),
						action: button.action.clone(),
					})
					.collect()
			})
			.collect();

		OutgoingMessage {
			text: self.text.render(locale),
			keyboard: (!rows.is_empty()).then_some(Keyboard { rows }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_text_and_labels_in_locale() {
		let template = MessageTemplate::new(Text::key("screens.settings.choose_option")).row(vec![
			ButtonTemplate::callback(Text::key("screens.settings.language"), "settings:language"),
			ButtonTemplate::callback(Text::key("common.back"), "back"),
		]);

		let en = template.render(Locale::En);
		assert_eq!(en.text, "Choose an option:");
		let keyboard = en.keyboard.unwrap();
		assert_eq!(keyboard.rows.len(), 1);
		assert_eq!(
			keyboard.rows[0][1].action,
			ButtonAction::Callback("back".to_string())
		);

		let es = template.render(Locale::Es);
		assert_eq!(es.text, "Elige una opción:");
		assert_ne!(es.keyboard.unwrap().rows[0][0].label, keyboard.rows[0][0].label);
	}

	#[test]
	fn raw_text_and_missing_keys_pass_through() {
		let template = MessageTemplate::new(Text::raw("{name} stays literal"))
			.row(vec![ButtonTemplate::url(Text::key("no.such.key"), "https://example.com")]);

		let message = template.render(Locale::Ru);
		assert_eq!(message.text, "{name} stays literal");
		assert_eq!(message.keyboard.unwrap().rows[0][0].label, "no.such.key");
	}

	#[test]
	fn parameters_are_substituted() {
		let text = Text::key_with("screens.start.welcome_back", Params::new().with("name", "Ana"));
		assert_eq!(text.render(Locale::En), "Welcome back, Ana!");
	}

	#[test]
	fn empty_rows_produce_no_keyboard() {
		let message = MessageTemplate::new(Text::raw("hi")).row(Vec::new()).render(Locale::En);
		assert!(message.keyboard.is_none());
	}
}
