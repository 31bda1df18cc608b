// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
	Pretty,
	Compact,
	Json,
}

impl From<LogLevel> for tracing::Level {
	fn from(level: LogLevel) -> Self {
		match level {
			LogLevel::Trace => tracing::Level::TRACE,
			LogLevel::Debug => tracing::Level::DEBUG,
			LogLevel::Info => tracing::Level::INFO,
			LogLevel::Warn => tracing::Level::WARN,
			LogLevel::Error => tracing::Level::ERROR,
		}
	}
}

/// Default filter directive. Targets match by prefix, so this covers the
/// library crates as well.
fn default_directive(level: LogLevel) -> String {
	format!("sourcemap_upload={}", tracing::Level::from(level))
}

/// Install the global subscriber. `RUST_LOG` overrides `level`.
///
/// Logs go to stderr; stdout is reserved for the result line and dry-run output.
pub fn init_tracing(level: LogLevel, format: LogFormat) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

	match format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(std::io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(std::io::stderr))
				.init();
		}
	}
}
