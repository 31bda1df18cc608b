// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project manifest (`package.json`) access.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::ConfigError;

/// File name of the project manifest, relative to the project root.
pub const MANIFEST_FILE: &str = "package.json";

/// A parsed project manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
	path: PathBuf,
	properties: Map<String, Value>,
}

impl Manifest {
	/// Manifest location for a project root.
	pub fn path_for(project_root: &Path) -> PathBuf {
		project_root.join(MANIFEST_FILE)
	}

	/// Read `<project_root>/package.json`.
	pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
		let path = Self::path_for(project_root);
		if !path.is_file() {
			return Err(ConfigError::ManifestNotFound { path });
		}

		debug!(path = %path.display(), "loading project manifest");

		let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::ManifestRead {
			path: path.clone(),
			source,
		})?;
		let properties: Map<String, Value> =
			serde_json::from_str(&content).map_err(|source| ConfigError::ManifestParse {
				path: path.clone(),
				source,
			})?;

		trace!(properties = properties.len(), "parsed project manifest");
		Ok(Self { path, properties })
	}

	/// A top-level string property. Non-string and empty values count as absent.
	pub fn string_property(&self, name: &str) -> Option<String> {
		self
			.properties
			.get(name)
			.and_then(Value::as_str)
			.filter(|value| !value.is_empty())
			.map(str::to_string)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn write_manifest(contents: &str) -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join(MANIFEST_FILE), contents).unwrap();
		dir
	}

	#[test]
	fn reads_string_properties() {
		let dir = write_manifest(r#"{"name":"app","version":"1.2.3","bugsnagApiKey":"abc"}"#);
		let manifest = Manifest::load(dir.path()).unwrap();

		assert_eq!(manifest.string_property("version").as_deref(), Some("1.2.3"));
		assert_eq!(manifest.string_property("bugsnagApiKey").as_deref(), Some("abc"));
		assert_eq!(manifest.path(), dir.path().join(MANIFEST_FILE));
	}

	#[test]
	fn non_string_and_empty_properties_are_absent() {
		let dir = write_manifest(r#"{"version":3,"bugsnagApiKey":""}"#);
		let manifest = Manifest::load(dir.path()).unwrap();

		assert_eq!(manifest.string_property("version"), None);
		assert_eq!(manifest.string_property("bugsnagApiKey"), None);
		assert_eq!(manifest.string_property("missing"), None);
	}

	#[test]
	fn missing_manifest_is_reported() {
		let dir = tempfile::tempdir().unwrap();
		let err = Manifest::load(dir.path()).unwrap_err();
		assert!(matches!(err, ConfigError::ManifestNotFound { .. }));
	}

	#[test]
	fn malformed_manifest_is_reported() {
		let dir = write_manifest("{ not json");
		let err = Manifest::load(dir.path()).unwrap_err();
		assert!(matches!(err, ConfigError::ManifestParse { .. }));
		assert!(err.to_string().contains("package.json"));
	}

	#[test]
	fn non_object_manifest_is_a_parse_error() {
		let dir = write_manifest("[1, 2, 3]");
		let err = Manifest::load(dir.path()).unwrap_err();
		assert!(matches!(err, ConfigError::ManifestParse { .. }));
	}
}
