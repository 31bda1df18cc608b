// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Flag → manifest → fatal value resolution.

use std::cell::OnceCell;
use std::path::PathBuf;

use tracing::trace;

use crate::manifest::Manifest;
use crate::ConfigError;

/// State shared by the resolution of every configuration value.
///
/// The manifest is read on first access only, and only if some value was not
/// supplied as a flag. Once read it is never mutated.
#[derive(Debug)]
pub struct ResolutionContext {
	project_root: PathBuf,
	manifest: OnceCell<Manifest>,
}

impl ResolutionContext {
	pub fn new(project_root: impl Into<PathBuf>) -> Self {
		Self {
			project_root: project_root.into(),
			manifest: OnceCell::new(),
		}
	}

	/// The project manifest, loaded on first call.
	pub fn manifest(&self) -> Result<&Manifest, ConfigError> {
		if let Some(manifest) = self.manifest.get() {
			return Ok(manifest);
		}
		let manifest = Manifest::load(&self.project_root)?;
		Ok(self.manifest.get_or_init(|| manifest))
	}

	/// Whether the manifest has been read yet.
	pub fn manifest_loaded(&self) -> bool {
		self.manifest.get().is_some()
	}

	/// A string property of the manifest.
	pub fn manifest_property(&self, name: &str) -> Result<Option<String>, ConfigError> {
		Ok(self.manifest()?.string_property(name))
	}

	/// Resolve a required value: the flag if given, else the manifest property.
	pub fn require(
		&self,
		flag_value: Option<String>,
		property: &'static str,
		flag: &'static str,
	) -> Result<String, ConfigError> {
		resolve_required(
			flag_value,
			|| self.manifest_property(property),
			property,
			flag,
			|| self.manifest_path(),
		)
	}

	/// Path of the loaded manifest, or where it would be loaded from.
	fn manifest_path(&self) -> PathBuf {
		self.manifest
			.get()
			.map(|manifest| manifest.path().to_path_buf())
			.unwrap_or_else(|| Manifest::path_for(&self.project_root))
	}
}

/// Use `flag_value` if present, otherwise ask `fallback`.
///
/// The fallback is not invoked when the flag is set.
pub fn resolve_optional<T, F>(flag_value: Option<T>, fallback: F) -> Result<Option<T>, ConfigError>
where
	F: FnOnce() -> Result<Option<T>, ConfigError>,
{
	match flag_value {
		Some(value) => {
			trace!("value supplied by flag");
			Ok(Some(value))
		}
		None => fallback(),
	}
}

/// Like [`resolve_optional`], but an absent value is a usage error naming the
/// manifest `property` and the `flag` that sets it.
pub fn resolve_required<T, F, M>(
	flag_value: Option<T>,
	fallback: F,
	property: &'static str,
	flag: &'static str,
	manifest_path: M,
) -> Result<T, ConfigError>
where
	F: FnOnce() -> Result<Option<T>, ConfigError>,
	M: FnOnce() -> PathBuf,
{
	resolve_optional(flag_value, fallback)?
		.ok_or_else(|| ConfigError::missing_property(property, flag, manifest_path()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::cell::Cell;

	fn project(manifest: Option<&str>) -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		if let Some(contents) = manifest {
			std::fs::write(dir.path().join("package.json"), contents).unwrap();
		}
		dir
	}

	#[test]
	fn flag_wins_and_skips_fallback() {
		let called = Cell::new(false);
		let value = resolve_optional(Some("flag"), || {
			called.set(true);
			Ok(Some("manifest"))
		})
		.unwrap();

		assert_eq!(value, Some("flag"));
		assert!(!called.get());
	}

	#[test]
	fn fallback_used_without_flag() {
		let value = resolve_optional(None, || Ok(Some(3))).unwrap();
		assert_eq!(value, Some(3));
	}

	#[test]
	fn required_value_missing_everywhere_is_usage_error() {
		let err = resolve_required::<String, _, _>(
			None,
			|| Ok(None),
			"version",
			"--app-version",
			|| PathBuf::from("/proj/package.json"),
		)
		.unwrap_err();

		assert!(err.is_usage());
		assert!(err.to_string().contains("--app-version"));
	}

	#[test]
	fn fallback_errors_propagate() {
		let err = resolve_required::<String, _, _>(
			None,
			|| Err(ConfigError::ManifestNotFound { path: "/x".into() }),
			"version",
			"--app-version",
			|| PathBuf::from("/x"),
		)
		.unwrap_err();

		assert!(matches!(err, ConfigError::ManifestNotFound { .. }));
	}

	#[test]
	fn manifest_not_read_when_flags_cover_everything() {
		let dir = project(None);
		let ctx = ResolutionContext::new(dir.path());

		let key = ctx.require(Some("key".into()), "bugsnagApiKey", "--api-key").unwrap();

		assert_eq!(key, "key");
		assert!(!ctx.manifest_loaded());
	}

	#[test]
	fn manifest_read_once_and_reused() {
		let dir = project(Some(r#"{"version":"2.0.0","bugsnagApiKey":"k"}"#));
		let ctx = ResolutionContext::new(dir.path());

		assert_eq!(ctx.require(None, "version", "--app-version").unwrap(), "2.0.0");
		std::fs::remove_file(dir.path().join("package.json")).unwrap();
		assert_eq!(ctx.require(None, "bugsnagApiKey", "--api-key").unwrap(), "k");
		assert!(ctx.manifest_loaded());
	}

	#[test]
	fn missing_manifest_property_names_flag() {
		let dir = project(Some(r#"{"version":"1.0.0"}"#));
		let ctx = ResolutionContext::new(dir.path());

		let err = ctx.require(None, "bugsnagApiKey", "--api-key").unwrap_err();

		assert!(err.is_usage());
		let message = err.to_string();
		assert!(message.contains("bugsnagApiKey"));
		assert!(message.contains("--api-key"));
		match err {
			ConfigError::MissingProperty { manifest, .. } => {
				assert_eq!(manifest, dir.path().join("package.json"));
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn missing_manifest_is_configuration_error() {
		let dir = project(None);
		let ctx = ResolutionContext::new(dir.path());

		let err = ctx.require(None, "bugsnagApiKey", "--api-key").unwrap_err();

		assert!(matches!(err, ConfigError::ManifestNotFound { .. }));
		assert!(!ctx.manifest_loaded());
	}
}
