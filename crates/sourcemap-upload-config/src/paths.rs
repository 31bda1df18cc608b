// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project root resolution.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Directory name package managers install dependencies into.
const DEPENDENCY_DIR: &str = "node_modules";

/// Default project root for a working directory.
///
/// When the tool runs from inside its own installed package (an npm script
/// executes with the package directory as cwd), the consuming project sits
/// two levels up.
pub fn default_project_root(cwd: &Path) -> PathBuf {
	let installed = cwd
		.components()
		.any(|component| matches!(component, Component::Normal(name) if name == OsStr::new(DEPENDENCY_DIR)));

	if !installed {
		return cwd.to_path_buf();
	}

	let root = cwd
		.parent()
		.map(|parent| parent.parent().unwrap_or(parent))
		.unwrap_or(cwd)
		.to_path_buf();
	tracing::debug!(
		cwd = %cwd.display(),
		root = %root.display(),
		"running from an installed dependency, using grandparent as project root"
	);
	root
}
