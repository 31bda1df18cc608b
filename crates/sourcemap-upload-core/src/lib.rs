// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map post-processing for release uploads.
//!
//! This crate provides:
//! - Loading a source map (flat or sectioned) as an order-preserving JSON document
//! - Enumerating every source file a map references
//! - Rewriting absolute source paths relative to a project root
//!
//! Only `sources` arrays are ever touched; every other field of the document
//! survives a load/trim/serialize cycle unchanged.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use sourcemap_upload_core::SourceMapDocument;
//!
//! let doc = SourceMapDocument::from_str(
//!     r#"{"version":3,"sources":["/proj/src/a.js","b.js"],"mappings":"AAAA"}"#,
//! )
//! .unwrap();
//!
//! let trimmed = doc.trim_root(Path::new("/proj")).unwrap();
//! assert_eq!(
//!     trimmed.to_json_string().unwrap(),
//!     r#"{"version":3,"sources":["src/a.js","b.js"],"mappings":"AAAA"}"#,
//! );
//! ```

pub mod document;
pub mod error;
pub mod path;

pub use document::SourceMapDocument;
pub use error::{Result, SourceMapError};
pub use path::{absolutize, absolutize_against, make_relative, relativize};
