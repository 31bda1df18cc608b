// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration error types.

use std::path::PathBuf;

/// Errors that can occur while resolving the upload configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	/// A value was neither passed as a flag nor found in the manifest
	#[error("missing `{property}`: set it in {} or pass {flag}", .manifest.display())]
	MissingProperty {
		property: &'static str,
		flag: &'static str,
		manifest: PathBuf,
	},

	/// The manifest was needed but does not exist
	#[error("could not find {}; pass the missing values as flags or use --project-root", .path.display())]
	ManifestNotFound { path: PathBuf },

	/// The manifest exists but could not be read
	#[error("could not read {}", .path.display())]
	ManifestRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The manifest is not a JSON object
	#[error("could not parse {}", .path.display())]
	ManifestParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	/// A required input file does not exist
	#[error("{flag} file does not exist: {}", .path.display())]
	FileNotFound { flag: &'static str, path: PathBuf },
}

impl ConfigError {
	/// Whether the error stems from bad or missing command-line input.
	pub fn is_usage(&self) -> bool {
		matches!(self, Self::MissingProperty { .. })
	}

	/// Create a missing property error
	pub fn missing_property(
		property: &'static str,
		flag: &'static str,
		manifest: impl Into<PathBuf>,
	) -> Self {
		Self::MissingProperty {
			property,
			flag,
			manifest: manifest.into(),
		}
	}
}
