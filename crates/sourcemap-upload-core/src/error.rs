// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for source map operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or rewriting a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
	#[error("could not read source map {}", .path.display())]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("source map {} is not valid JSON", .path.display())]
	Parse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("failed to serialize source map")]
	Serialize(#[source] serde_json::Error),

	#[error("could not determine current directory")]
	CurrentDir(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceMapError>;
