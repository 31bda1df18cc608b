// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration resolution for source map uploads.
//!
//! This crate provides:
//! - The immutable [`ConfigurationBundle`] assembled once per run
//! - Flag → `package.json` property → fatal fallback resolution
//! - A lazily read, never mutated project manifest
//! - Project root defaulting when installed under `node_modules`
//! - A redacting [`ApiKey`] wrapper

pub mod api_key;
pub mod bundle;
pub mod error;
pub mod manifest;
pub mod paths;
pub mod resolve;

pub use api_key::ApiKey;
pub use bundle::{ConfigInputs, ConfigurationBundle, VersionIdentifier, DEFAULT_MINIFIED_URL};
pub use error::ConfigError;
pub use manifest::{Manifest, MANIFEST_FILE};
pub use paths::default_project_root;
pub use resolve::{resolve_optional, resolve_required, ResolutionContext};
