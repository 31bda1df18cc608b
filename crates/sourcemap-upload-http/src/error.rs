// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for payload assembly and upload.

use std::path::PathBuf;

use sourcemap_upload_core::SourceMapError;
use thiserror::Error;

/// Result type alias for upload operations.
pub type Result<T> = std::result::Result<T, UploadError>;

/// Errors that can occur while assembling or sending an upload.
#[derive(Debug, Error)]
pub enum UploadError {
	/// The trimmed source map could not be serialized.
	#[error(transparent)]
	SourceMap(#[from] SourceMapError),

	/// A file part could not be opened for streaming.
	#[error("could not open {}", .path.display())]
	OpenFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The HTTP client could not be constructed.
	#[error("failed to build HTTP client")]
	ClientBuild(#[source] reqwest::Error),

	/// HTTP request failed.
	#[error("HTTP request failed")]
	Request(#[from] reqwest::Error),

	/// Server rejected the upload.
	#[error("server error (status {status}): {message}")]
	Server {
		/// HTTP status code.
		status: u16,
		/// Response body.
		message: String,
	},
}
