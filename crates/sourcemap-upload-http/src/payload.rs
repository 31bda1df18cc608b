// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upload payload assembly.
//!
//! The payload is a plain description of the form to send. Files are
//! referenced by path and only opened by the transport at send time.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sourcemap_upload_config::{ApiKey, ConfigurationBundle};
use sourcemap_upload_core::{relativize, SourceMapDocument};
use tracing::{debug, instrument, warn};

use crate::error::Result;

pub const OVERWRITE_FIELD: &str = "overwrite";
pub const API_KEY_FIELD: &str = "apiKey";
pub const MINIFIED_URL_FIELD: &str = "minifiedUrl";
pub const MINIFIED_FILE_FIELD: &str = "minifiedFile";
pub const SOURCE_MAP_FIELD: &str = "sourceMap";

const RESERVED_FIELDS: &[&str] = &[
	OVERWRITE_FIELD,
	API_KEY_FIELD,
	MINIFIED_URL_FIELD,
	MINIFIED_FILE_FIELD,
	SOURCE_MAP_FIELD,
	"appVersion",
	"codeBundleId",
];

/// A single form field value.
#[derive(Debug, Clone, PartialEq)]
pub enum PayloadValue {
	Text(String),
	Flag(bool),
	/// Sent verbatim, shown redacted.
	Secret(ApiKey),
	/// A serialized JSON document, sent as a file part.
	Json(String),
	/// A file on disk, streamed at send time.
	FileContent(PathBuf),
}

impl fmt::Display for PayloadValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(value) => f.write_str(value),
			Self::Flag(value) => write!(f, "{value}"),
			Self::Secret(key) => write!(f, "{key}"),
			Self::Json(document) => write!(f, "<json, {} bytes>", document.len()),
			Self::FileContent(path) => write!(f, "@{}", path.display()),
		}
	}
}

/// Form fields keyed by name. Inserting an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadPayload {
	fields: BTreeMap<String, PayloadValue>,
}

impl UploadPayload {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, name: impl Into<String>, value: PayloadValue) -> Option<PayloadValue> {
		self.fields.insert(name.into(), value)
	}

	pub fn get(&self, name: &str) -> Option<&PayloadValue> {
		self.fields.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.fields.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &PayloadValue)> {
		self.fields.iter().map(|(name, value)| (name.as_str(), value))
	}

	/// Paths of every file the payload will stream.
	pub fn files(&self) -> impl Iterator<Item = &Path> {
		self.fields.values().filter_map(|value| match value {
			PayloadValue::FileContent(path) => Some(path.as_path()),
			_ => None,
		})
	}
}

/// Assemble the upload form.
///
/// `source_files` is the enumeration of the *untrimmed* source map; it is only
/// consulted when the configuration asks for sources. Files missing on disk
/// are skipped. Relative source paths are checked against the working
/// directory.
#[instrument(skip_all, fields(upload_sources = config.upload_sources))]
pub fn build_payload(
	config: &ConfigurationBundle,
	trimmed: &SourceMapDocument,
	source_files: &[&Value],
) -> Result<UploadPayload> {
	let mut payload = UploadPayload::new();

	payload.insert(OVERWRITE_FIELD, PayloadValue::Flag(true));
	payload.insert(API_KEY_FIELD, PayloadValue::Secret(config.api_key.clone()));
	payload.insert(
		config.version.field_name(),
		PayloadValue::Text(config.version.value().to_string()),
	);
	payload.insert(
		MINIFIED_URL_FIELD,
		PayloadValue::Text(config.minified_url.clone()),
	);
	payload.insert(
		MINIFIED_FILE_FIELD,
		PayloadValue::FileContent(config.minified_file.clone()),
	);
	payload.insert(SOURCE_MAP_FIELD, PayloadValue::Json(trimmed.to_json_string()?));

	if config.upload_sources {
		let mut attached = 0usize;
		let mut skipped = 0usize;

		for source in source_files {
			let Some(path) = source.as_str() else {
				debug!(source = %source, "skipping non-string source entry");
				continue;
			};

			if !Path::new(path).is_file() {
				debug!(path, "source file not found, skipping");
				skipped += 1;
				continue;
			}

			let key = relativize(&config.project_root, path);
			if RESERVED_FIELDS.contains(&key.as_str()) {
				warn!(path, key = %key, "source file name collides with an upload field, skipping");
				skipped += 1;
				continue;
			}

			payload.insert(key, PayloadValue::FileContent(PathBuf::from(path)));
			attached += 1;
		}

		debug!(attached, skipped, "collected source files");
	}

	Ok(payload)
}
