// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Upload payload assembly and transport.
//!
//! This crate provides:
//! - [`build_payload`], which turns a resolved configuration and a trimmed
//!   source map into an [`UploadPayload`] without touching the network
//! - [`UploadClient`], which sends a payload as one multipart POST
//! - A pre-configured HTTP client with a consistent User-Agent header

mod client;
pub mod error;
pub mod payload;
pub mod transport;

pub use client::{builder, new_client, user_agent};
pub use error::{Result, UploadError};
pub use payload::{build_payload, PayloadValue, UploadPayload};
pub use transport::{UploadClient, DEFAULT_ENDPOINT};
