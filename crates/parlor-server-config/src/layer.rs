// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration, merged across sources before finalizing.

use serde::Deserialize;

use crate::sections::{DatabaseConfigLayer, I18nConfigLayer, LoggingConfigLayer, StoreConfigLayer};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub store: Option<StoreConfigLayer>,
	#[serde(default)]
	pub i18n: Option<I18nConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: impl FnOnce(&mut T, T)) {
	let Some(incoming) = other else {
		return;
	};
	match base.as_mut() {
		Some(existing) => merge(existing, incoming),
		None => *base = Some(incoming),
	}
}

impl ServerConfigLayer {
	/// Merge `other` on top of `self`; fields set in `other` win.
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.database, other.database, DatabaseConfigLayer::merge);
		merge_section(&mut self.store, other.store, StoreConfigLayer::merge);
		merge_section(&mut self.i18n, other.i18n, I18nConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}
