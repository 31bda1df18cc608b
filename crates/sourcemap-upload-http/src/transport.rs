// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Multipart transport for upload payloads.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use tokio::fs::File;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{Result, UploadError};
use crate::payload::{PayloadValue, UploadPayload};

/// Default upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://upload.bugsnag.com";

/// File name given to the serialized source map part.
const SOURCE_MAP_FILE_NAME: &str = "source-map.json";
const JSON_MIME: &str = "application/json";
const OCTET_STREAM_MIME: &str = "application/octet-stream";

/// Sends upload payloads to a single endpoint.
///
/// # Example
///
/// ```ignore
/// let client = UploadClient::new(DEFAULT_ENDPOINT)?;
/// client.upload(&payload).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UploadClient {
	http: Client,
	endpoint: String,
}

impl UploadClient {
	/// Create a client with the standard User-Agent.
	pub fn new(endpoint: impl Into<String>) -> Result<Self> {
		let http = crate::client::new_client().map_err(UploadError::ClientBuild)?;
		Ok(Self::with_client(http, endpoint))
	}

	/// Create a client around an existing HTTP client.
	pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
		Self {
			http,
			endpoint: endpoint.into(),
		}
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Send `payload` as one multipart POST.
	///
	/// Files are opened here and streamed; every handle is dropped once the
	/// request finishes, whether it succeeded or not. Non-2xx responses are
	/// returned as [`UploadError::Server`] with the response body.
	#[instrument(skip_all, fields(endpoint = %self.endpoint, fields = payload.len()))]
	pub async fn upload(&self, payload: &UploadPayload) -> Result<()> {
		let form = build_form(payload).await?;

		let response = self.http.post(&self.endpoint).multipart(form).send().await?;

		let status = response.status();
		if status.is_success() {
			info!(status = status.as_u16(), "upload accepted");
			return Ok(());
		}

		let message = match response.text().await {
			Ok(body) => body,
			Err(err) => {
				warn!(error = %err, "could not read error response body");
				format!("<unreadable body: {err}>")
			}
		};
		error!(status = status.as_u16(), message = %message, "upload rejected");
		Err(UploadError::Server {
			status: status.as_u16(),
			message,
		})
	}
}

async fn build_form(payload: &UploadPayload) -> Result<Form> {
	// Source file fields are keyed by their relative path; keep the slashes.
	let mut form = Form::new().percent_encode_noop();

	for (name, value) in payload.iter() {
		let part = match value {
			PayloadValue::Text(text) => Part::text(text.clone()),
			PayloadValue::Flag(flag) => Part::text(flag.to_string()),
			PayloadValue::Secret(key) => Part::text(key.expose().to_string()),
			PayloadValue::Json(document) => Part::text(document.clone())
				.file_name(SOURCE_MAP_FILE_NAME)
				.mime_str(JSON_MIME)?,
			PayloadValue::FileContent(path) => file_part(path).await?,
		};
		form = form.part(name.to_string(), part);
	}

	Ok(form)
}

async fn file_part(path: &Path) -> Result<Part> {
	let open_error = |source| UploadError::OpenFile {
		path: path.to_path_buf(),
		source,
	};

	let file = File::open(path).await.map_err(open_error)?;
	let length = file.metadata().await.map_err(open_error)?.len();
	debug!(path = %path.display(), length, "streaming file part");

	let file_name = path
		.file_name()
		.map(|name| name.to_string_lossy().into_owned())
		.unwrap_or_else(|| path.to_string_lossy().into_owned());

	let body = Body::wrap_stream(ReaderStream::new(file));
	Ok(Part::stream_with_length(body, length)
		.file_name(file_name)
		.mime_str(OCTET_STREAM_MIME)?)
}
