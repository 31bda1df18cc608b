// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project API key wrapper.
//!
//! The key is sent verbatim as a form field, but must never show up in logs
//! or dry-run output. `Debug` and `Display` are redacted and the buffer is
//! zeroized on drop; call [`ApiKey::expose`] to read it.

use std::fmt;

use zeroize::Zeroize;

/// The redaction placeholder used in all output.
pub const REDACTED: &str = "[REDACTED]";

#[derive(Clone, PartialEq, Eq, Zeroize)]
#[zeroize(drop)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Explicitly access the key.
	pub fn expose(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ApiKey").field(&REDACTED).finish()
	}
}

impl fmt::Display for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl From<String> for ApiKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}
