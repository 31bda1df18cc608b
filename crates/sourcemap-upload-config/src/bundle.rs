// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The resolved, immutable configuration of one upload run.

use std::path::{Path, PathBuf};

use sourcemap_upload_core::absolutize_against;
use tracing::{info, instrument};

use crate::paths::default_project_root;
use crate::resolve::ResolutionContext;
use crate::{ApiKey, ConfigError};

/// URL the minified bundle is served from when none is given.
pub const DEFAULT_MINIFIED_URL: &str = "main.jsbundle";

/// Manifest property holding the project API key.
const API_KEY_PROPERTY: &str = "bugsnagApiKey";
/// Manifest property holding the app version.
const VERSION_PROPERTY: &str = "version";

/// The release the uploaded artifacts are keyed by.
///
/// Decided once during resolution. A code bundle identifier always wins and
/// suppresses app version lookup entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionIdentifier {
	AppVersion(String),
	CodeBundleId(String),
}

impl VersionIdentifier {
	/// Upload form field carrying this identifier.
	pub fn field_name(&self) -> &'static str {
		match self {
			Self::AppVersion(_) => "appVersion",
			Self::CodeBundleId(_) => "codeBundleId",
		}
	}

	pub fn value(&self) -> &str {
		match self {
			Self::AppVersion(value) | Self::CodeBundleId(value) => value,
		}
	}
}

/// Raw values as supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
	pub api_key: Option<String>,
	pub app_version: Option<String>,
	pub code_bundle_id: Option<String>,
	pub minified_file: PathBuf,
	pub minified_url: Option<String>,
	pub source_map: PathBuf,
	pub project_root: Option<PathBuf>,
	pub upload_sources: bool,
}

/// Fully resolved configuration. Built once per run and only read afterwards.
#[derive(Debug, Clone)]
pub struct ConfigurationBundle {
	/// Absolute directory source paths are made relative to.
	pub project_root: PathBuf,
	pub api_key: ApiKey,
	pub version: VersionIdentifier,
	/// Absolute path of the minified bundle.
	pub minified_file: PathBuf,
	pub minified_url: String,
	/// Absolute path of the source map.
	pub source_map: PathBuf,
	pub upload_sources: bool,
}

impl ConfigurationBundle {
	/// Resolve raw inputs against `cwd` and, where needed, the project manifest.
	///
	/// Input files are checked before any manifest access, so a typo in a
	/// path is reported even when the manifest is missing too.
	#[instrument(skip_all, fields(cwd = %cwd.display()))]
	pub fn resolve(inputs: ConfigInputs, cwd: &Path) -> Result<Self, ConfigError> {
		let project_root = match &inputs.project_root {
			Some(root) => absolutize_against(cwd, root),
			None => default_project_root(cwd),
		};

		let source_map = require_file(cwd, &inputs.source_map, "--source-map")?;
		let minified_file = require_file(cwd, &inputs.minified_file, "--minified-file")?;

		let ctx = ResolutionContext::new(&project_root);

		let api_key = ctx
			.require(non_empty(inputs.api_key), API_KEY_PROPERTY, "--api-key")
			.map(ApiKey::from)?;

		let version = match non_empty(inputs.code_bundle_id) {
			Some(id) => VersionIdentifier::CodeBundleId(id),
			None => VersionIdentifier::AppVersion(ctx.require(
				non_empty(inputs.app_version),
				VERSION_PROPERTY,
				"--app-version",
			)?),
		};

		let minified_url =
			non_empty(inputs.minified_url).unwrap_or_else(|| DEFAULT_MINIFIED_URL.to_string());

		info!(
			project_root = %project_root.display(),
			version_field = version.field_name(),
			version = version.value(),
			minified_url = %minified_url,
			upload_sources = inputs.upload_sources,
			manifest_read = ctx.manifest_loaded(),
			"resolved upload configuration"
		);

		Ok(Self {
			project_root,
			api_key,
			version,
			minified_file,
			minified_url,
			source_map,
			upload_sources: inputs.upload_sources,
		})
	}
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.trim().is_empty())
}

fn require_file(cwd: &Path, path: &Path, flag: &'static str) -> Result<PathBuf, ConfigError> {
	let resolved = absolutize_against(cwd, path);
	if resolved.is_file() {
		Ok(resolved)
	} else {
		Err(ConfigError::FileNotFound {
			flag,
			path: path.to_path_buf(),
		})
	}
}
