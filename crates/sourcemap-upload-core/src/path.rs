// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project-root relative path rewriting.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use serde_json::Value;

use crate::error::{Result, SourceMapError};

/// Rewrite a source map entry relative to `root`.
///
/// Only absolute path strings are rewritten. Relative strings keep the
/// author's semantics and non-string values pass through untouched, since
/// nothing guarantees that a `sources` entry is a string.
pub fn make_relative(root: &Path, candidate: &Value) -> Value {
	match candidate {
		Value::String(path) => Value::String(relativize(root, path)),
		other => other.clone(),
	}
}

/// Express `candidate` relative to `root` if it is absolute, otherwise return it as is.
///
/// Both sides are lexically cleaned first so `..` and `.` components do not
/// leak into the result. A candidate equal to `root` yields an empty string.
pub fn relativize(root: &Path, candidate: &str) -> String {
	let path = Path::new(candidate);
	if !path.is_absolute() {
		return candidate.to_string();
	}

	match pathdiff::diff_paths(path.clean(), root.clean()) {
		Some(relative) => relative.to_string_lossy().into_owned(),
		None => candidate.to_string(),
	}
}

/// Resolve `path` against `base` when relative, then clean it.
pub fn absolutize_against(base: &Path, path: &Path) -> PathBuf {
	if path.is_absolute() {
		path.clean()
	} else {
		base.join(path).clean()
	}
}

/// Resolve `path` against the process working directory when relative.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
	if path.is_absolute() {
		return Ok(path.clean());
	}
	let cwd = std::env::current_dir().map_err(SourceMapError::CurrentDir)?;
	Ok(absolutize_against(&cwd, path))
}
