// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Named-parameter substitution for `{name}` placeholders.

use std::fmt::Display;

/// Named values substituted into a template.
///
/// Values are stringified when added. Setting a name twice keeps the last
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
	entries: Vec<(String, String)>,
}

impl Params {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.set(name, value);
		self
	}

	pub fn set(&mut self, name: impl Into<String>, value: impl Display) -> &mut Self {
		let name = name.into();
		let value = value.to_string();
		match self.entries.iter_mut().find(|(n, _)| *n == name) {
			Some(entry) => entry.1 = value,
			None => self.entries.push((name, value)),
		}
		self
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self
			.entries
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_str())
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Substitute every `{name}` in `template` whose name is present.
	///
	/// The template is scanned once from left to right and substituted text
	/// is never rescanned, so the output does not depend on the order the
	/// parameters were added in. Placeholders without a matching parameter
	/// and stray braces are copied through literally.
	pub fn apply(&self, template: &str) -> String {
		if self.is_empty() || !template.contains('{') {
			return template.to_string();
		}

		let mut out = String::with_capacity(template.len());
		let mut rest = template;
		while let Some(open) = rest.find('{') {
			out.push_str(&rest[..open]);
			let after = &rest[open + 1..];
			let Some(close) = after.find('}') else {
				rest = &rest[open..];
				break;
			};
			match self.get(&after[..close]) {
				Some(value) => {
					out.push_str(value);
					rest = &after[close + 1..];
				}
				None => {
					// Not one of ours; keep the brace and keep scanning inside it.
					out.push('{');
					rest = after;
				}
			}
		}
		out.push_str(rest);
		out
	}
}

impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut params = Params::new();
		for (name, value) in iter {
			params.set(name, value);
		}
		params
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn replaces_every_occurrence() {
		let params = Params::new().with("name", "Ana").with("n", 3);
		assert_eq!(
			params.apply("Hello {name}, you have {n} items, {name}!"),
			"Hello Ana, you have 3 items, Ana!"
		);
	}

	#[test]
	fn unknown_placeholders_stay_literal() {
		let params = Params::new().with("name", "Ana");
		assert_eq!(params.apply("{greeting}, {name}"), "{greeting}, Ana");
	}

	#[test]
	fn unused_params_are_ignored() {
		let params = Params::new().with("unused", 1);
		assert_eq!(params.apply("plain text"), "plain text");
		assert_eq!(params.apply("{other}"), "{other}");
	}

	#[test]
	fn stray_braces_survive() {
		let params = Params::new().with("x", "1");
		assert_eq!(params.apply("{ {x} }"), "{ 1 }");
		assert_eq!(params.apply("open {x"), "open {x");
		assert_eq!(params.apply("{{x}}"), "{1}");
		assert_eq!(params.apply("}{x}{"), "}1{");
	}

	#[test]
	fn substituted_values_are_not_rescanned() {
		let forward = Params::new().with("a", "{b}").with("b", "B");
		let backward = Params::new().with("b", "B").with("a", "{b}");
		assert_eq!(forward.apply("{a}{b}"), "{b}B");
		assert_eq!(backward.apply("{a}{b}"), "{b}B");
	}

	#[test]
	fn set_overwrites_existing_name() {
		let mut params = Params::new();
		params.set("n", 1).set("n", 2);
		assert_eq!(params.len(), 1);
		assert_eq!(params.get("n"), Some("2"));
	}

	#[test]
	fn collects_from_pairs() {
		let params: Params = [("a", 1), ("b", 2)].into_iter().collect();
		assert_eq!(params.apply("{b}{a}"), "21");
	}

	proptest! {
		#[test]
		fn templates_without_braces_are_untouched(text in "[^{}]{0,64}", value in "[a-z]{0,8}") {
			let params = Params::new().with("name", value);
			prop_assert_eq!(params.apply(&text), text);
		}

		#[test]
		fn parameter_order_does_not_matter(a in "[^{}]{0,8}", b in "[^{}]{0,8}") {
			let template = "{a}-{b}-{a}";
			let ab = Params::new().with("a", &a).with("b", &b).apply(template);
			let ba = Params::new().with("b", &b).with("a", &a).apply(template);
			prop_assert_eq!(&ab, &ba);
			prop_assert_eq!(ab, format!("{a}-{b}-{a}"));
		}
	}
}
