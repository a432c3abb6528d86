// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Embedded message catalogs and dotted key path lookup.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::format::Params;
use crate::locale::{Locale, DEFAULT_LOCALE};

static CATALOGS: Lazy<HashMap<Locale, Value>> = Lazy::new(|| {
	Locale::ALL
		.iter()
		.map(|&locale| (locale, parse_catalog(locale, catalog_source(locale))))
		.collect()
});

fn catalog_source(locale: Locale) -> &'static str {
	match locale {
		Locale::En => include_str!("../locales/en.json"),
		Locale::Es => include_str!("../locales/es.json"),
		Locale::Ru => include_str!("../locales/ru.json"),
	}
}

/// A catalog that fails to parse is served as an empty tree so every lookup
/// against it degrades to a miss.
fn parse_catalog(locale: Locale, source: &str) -> Value {
	match serde_json::from_str::<Value>(source) {
		Ok(tree @ Value::Object(_)) => tree,
		Ok(_) => {
			tracing::error!(%locale, "message catalog root is not an object");
			Value::Object(Map::new())
		}
		Err(e) => {
			tracing::error!(%locale, error = %e, "failed to parse message catalog");
			Value::Object(Map::new())
		}
	}
}

fn catalog(locale: Locale) -> &'static Value {
	static EMPTY: Lazy<Value> = Lazy::new(|| Value::Object(Map::new()));
	CATALOGS.get(&locale).unwrap_or(&*EMPTY)
}

/// Walk `tree` one dotted segment at a time. Scalar leaves are rendered as
/// text; objects, arrays, nulls and missing segments are misses.
fn lookup<'a>(tree: &'a Value, key_path: &str) -> Option<Cow<'a, str>> {
	let mut node = tree;
	for segment in key_path.split('.') {
		node = node.as_object()?.get(segment)?;
	}
	match node {
		Value::String(s) => Some(Cow::Borrowed(s.as_str())),
		Value::Number(n) => Some(Cow::Owned(n.to_string())),
		Value::Bool(b) => Some(Cow::Owned(b.to_string())),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}

/// Translate `key_path` for `locale`.
///
/// Returns `key_path` unchanged when it does not name a template.
pub fn t(locale: Locale, key_path: &str) -> String {
	t_fmt(locale, key_path, &Params::new())
}

/// Translate `key_path` in the default locale.
pub fn t_default(key_path: &str) -> String {
	t(DEFAULT_LOCALE, key_path)
}

/// Translate `key_path` for `locale`, substituting `{name}` placeholders.
///
/// A miss returns `key_path` unchanged, without substitution.
pub fn t_fmt(locale: Locale, key_path: &str, params: &Params) -> String {
	match lookup(catalog(locale), key_path) {
		Some(template) => params.apply(&template),
		None => {
			tracing::debug!(%locale, key = key_path, "template miss");
			key_path.to_string()
		}
	}
}

/// Returns true if `key_path` names a template in `locale`.
pub fn has_key(locale: Locale, key_path: &str) -> bool {
	lookup(catalog(locale), key_path).is_some()
}

/// All template key paths of `locale`, sorted.
pub fn catalog_keys(locale: Locale) -> Vec<String> {
	fn collect(node: &Value, prefix: &str, out: &mut Vec<String>) {
		match node {
			Value::Object(map) => {
				for (segment, child) in map {
					let path = if prefix.is_empty() {
						segment.clone()
					} else {
						format!("{prefix}.{segment}")
					};
					collect(child, &path, out);
				}
			}
			Value::String(_) | Value::Number(_) | Value::Bool(_) => out.push(prefix.to_string()),
			Value::Null | Value::Array(_) => {}
		}
	}

	let mut keys = Vec::new();
	collect(catalog(locale), "", &mut keys);
	keys.sort();
	keys
}
