// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map document loading, enumeration and root trimming.
//!
//! A document is kept as an order-preserving JSON value rather than a typed
//! struct, so fields this crate does not know about (`mappings`, `names`,
//! `x_google_ignoreList`, ...) are serialized back exactly as they were read.
//! Two shapes are recognised:
//!
//! - flat: a top-level `sources` array
//! - sectioned: a top-level `sections` array whose entries carry a `map`
//!   with its own `sources`
//!
//! Nested sections below that first level are left alone.

use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{Result, SourceMapError};
use crate::path::{absolutize, make_relative};

const SOURCES: &str = "sources";
const SECTIONS: &str = "sections";
const MAP: &str = "map";

/// A parsed source map, flat or sectioned.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceMapDocument {
	value: Value,
}

impl SourceMapDocument {
	/// Read and parse a source map from disk.
	#[instrument(skip_all, fields(path = %path.display()))]
	pub fn load(path: &Path) -> Result<Self> {
		let data = std::fs::read(path).map_err(|source| SourceMapError::Read {
			path: path.to_path_buf(),
			source,
		})?;

		let value = serde_json::from_slice(&data).map_err(|source| SourceMapError::Parse {
			path: path.to_path_buf(),
			source,
		})?;

		let document = Self { value };
		debug!(
			bytes = data.len(),
			sectioned = document.is_sectioned(),
			"loaded source map"
		);
		Ok(document)
	}

	/// Parse a source map from a JSON string.
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(data: &str) -> Result<Self> {
		let value = serde_json::from_str(data).map_err(|source| SourceMapError::Parse {
			path: "<inline>".into(),
			source,
		})?;
		Ok(Self { value })
	}

	/// Whether the document uses the sectioned (index map) shape.
	pub fn is_sectioned(&self) -> bool {
		self.value.get(SECTIONS).is_some_and(Value::is_array)
	}

	/// Every source path referenced by the map, in document order.
	///
	/// Top-level `sources` come first, then each section's `map.sources` in
	/// section order. Duplicates are kept.
	pub fn enumerate_sources(&self) -> Vec<&Value> {
		let mut sources: Vec<&Value> = Vec::new();

		if let Some(top) = self.value.get(SOURCES).and_then(Value::as_array) {
			sources.extend(top);
		}

		if let Some(sections) = self.value.get(SECTIONS).and_then(Value::as_array) {
			for section in sections {
				if let Some(nested) = section
					.get(MAP)
					.and_then(|map| map.get(SOURCES))
					.and_then(Value::as_array)
				{
					sources.extend(nested);
				}
			}
		}

		sources
	}

	/// Rewrite every absolute source path relative to `root`.
	///
	/// `root` is resolved against the current working directory when it is
	/// relative. The document is consumed and returned with only its
	/// `sources` arrays changed.
	#[instrument(skip_all, fields(root = %root.display()))]
	pub fn trim_root(mut self, root: &Path) -> Result<Self> {
		let root = absolutize(root)?;
		let mut rewritten = 0usize;

		if let Some(top) = self.value.get_mut(SOURCES) {
			rewritten += rewrite_sources(&root, top);
		}

		if let Some(sections) = self.value.get_mut(SECTIONS).and_then(Value::as_array_mut) {
			for section in sections {
				if let Some(nested) = section.get_mut(MAP).and_then(|map| map.get_mut(SOURCES)) {
					rewritten += rewrite_sources(&root, nested);
				}
			}
		}

		debug!(rewritten, "trimmed source map root");
		Ok(self)
	}

	/// Serialize the document back to compact JSON.
	pub fn to_json_string(&self) -> Result<String> {
		serde_json::to_string(&self.value).map_err(SourceMapError::Serialize)
	}

	pub fn as_value(&self) -> &Value {
		&self.value
	}

	pub fn into_value(self) -> Value {
		self.value
	}
}

impl From<Value> for SourceMapDocument {
	fn from(value: Value) -> Self {
		Self { value }
	}
}

/// Replace each entry of a `sources` array in place. Returns how many changed.
fn rewrite_sources(root: &Path, sources: &mut Value) -> usize {
	let Some(entries) = sources.as_array_mut() else {
		return 0;
	};

	let mut changed = 0;
	for entry in entries.iter_mut() {
		let relative = make_relative(root, entry);
		if relative != *entry {
			*entry = relative;
			changed += 1;
		}
	}
	changed
}
