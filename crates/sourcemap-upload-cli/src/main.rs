// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! sourcemap-upload - ship a minified bundle and its source map for symbolication
//!
//! Run once per release from a build pipeline. Absolute source paths in the
//! map are rewritten relative to the project root before upload, and the
//! referenced original sources can be uploaded alongside.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing::{debug, error, info};

use sourcemap_upload_config::{ConfigError, ConfigInputs, ConfigurationBundle, DEFAULT_MINIFIED_URL};
use sourcemap_upload_core::SourceMapDocument;
use sourcemap_upload_http::{build_payload, UploadClient, UploadPayload, DEFAULT_ENDPOINT};

mod logging;

use logging::{init_tracing, LogFormat, LogLevel};

/// Exit status for bad or missing command-line input.
const USAGE_EXIT: u8 = 2;

/// Upload a minified JavaScript bundle and its source map
#[derive(Parser, Debug)]
#[command(name = "sourcemap-upload", version, about, long_about = None)]
struct Args {
	/// Minified bundle file
	#[arg(long, value_name = "FILE")]
	minified_file: PathBuf,

	/// Source map of the minified bundle
	#[arg(long, value_name = "FILE")]
	source_map: PathBuf,

	/// Project API key (default: `bugsnagApiKey` from package.json)
	#[arg(long, value_name = "KEY", env = "BUGSNAG_API_KEY", hide_env_values = true)]
	api_key: Option<String>,

	/// App version (default: `version` from package.json; ignored with --code-bundle-id)
	#[arg(long, value_name = "VERSION")]
	app_version: Option<String>,

	/// Code bundle identifier, used instead of the app version
	#[arg(long, value_name = "ID")]
	code_bundle_id: Option<String>,

	/// URL the minified bundle is served from
	#[arg(long, value_name = "URL", default_value = DEFAULT_MINIFIED_URL)]
	minified_url: String,

	/// Directory source paths are made relative to (default: current directory)
	#[arg(long, value_name = "DIR")]
	project_root: Option<PathBuf>,

	/// Also upload every source file referenced by the source map
	#[arg(long)]
	upload_sources: bool,

	/// Upload endpoint
	#[arg(long, value_name = "URL", env = "BUGSNAG_UPLOAD_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
	endpoint: String,

	/// Assemble the upload and print its fields without sending anything
	#[arg(long)]
	dry_run: bool,

	/// Log level (overridden by RUST_LOG)
	#[arg(long, value_enum, default_value_t = LogLevel::Warn)]
	log_level: LogLevel,

	/// Log output format
	#[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
	log_format: LogFormat,
}

impl From<&Args> for ConfigInputs {
	fn from(args: &Args) -> Self {
		Self {
			api_key: args.api_key.clone(),
			app_version: args.app_version.clone(),
			code_bundle_id: args.code_bundle_id.clone(),
			minified_file: args.minified_file.clone(),
			minified_url: Some(args.minified_url.clone()),
			source_map: args.source_map.clone(),
			project_root: args.project_root.clone(),
			upload_sources: args.upload_sources,
		}
	}
}

/// Resolve configuration and assemble the upload without sending it.
fn prepare(args: &Args, cwd: &Path) -> Result<(ConfigurationBundle, UploadPayload)> {
	let config = ConfigurationBundle::resolve(ConfigInputs::from(args), cwd)?;

	let document = SourceMapDocument::load(&config.source_map)?;
	let sources = if config.upload_sources {
		document.enumerate_sources()
	} else {
		Vec::new()
	};
	debug!(count = sources.len(), "enumerated source files");

	let trimmed = document.clone().trim_root(&config.project_root)?;
	let payload = build_payload(&config, &trimmed, &sources)?;

	Ok((config, payload))
}

async fn run(args: Args) -> Result<()> {
	let cwd = std::env::current_dir().context("could not determine current directory")?;
	let (config, payload) = prepare(&args, &cwd)?;

	if args.dry_run {
		info!(fields = payload.len(), "dry run, not uploading");
		write_dry_run(&payload, &mut std::io::stdout().lock())?;
		return Ok(());
	}

	let client = UploadClient::new(&args.endpoint)?;
	client
		.upload(&payload)
		.await
		.with_context(|| format!("failed to upload source map to {}", client.endpoint()))?;

	println!("Uploaded source map for {}", config.minified_url);
	Ok(())
}

/// One `name: value` line per field. Secrets render redacted.
fn write_dry_run(payload: &UploadPayload, out: &mut impl Write) -> std::io::Result<()> {
	for (name, value) in payload.iter() {
		writeln!(out, "{name}: {value}")?;
	}
	out.flush()
}

/// Exit status for a fatal error: usage errors are distinguished from the rest.
fn exit_status(err: &anyhow::Error) -> u8 {
	let usage = err
		.chain()
		.filter_map(|cause| cause.downcast_ref::<ConfigError>())
		.any(ConfigError::is_usage);
	if usage {
		USAGE_EXIT
	} else {
		1
	}
}

fn report(err: &anyhow::Error) -> ExitCode {
	error!(error = %format!("{err:#}"), "source map upload failed");

	let status = exit_status(err);
	if status == USAGE_EXIT {
		eprintln!("error: {err:#}\n\n{}", Args::command().render_usage());
	} else {
		eprintln!("error: {err:#}");
	}
	ExitCode::from(status)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	let args = Args::parse();
	init_tracing(args.log_level, args.log_format);

	match run(args).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => report(&err),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use clap::error::ErrorKind;
	use sourcemap_upload_config::VersionIdentifier;
	use sourcemap_upload_http::PayloadValue;

	fn parse(extra: &[&str]) -> std::result::Result<Args, clap::Error> {
		let mut argv = vec![
			"sourcemap-upload",
			"--minified-file",
			"main.jsbundle",
			"--source-map",
			"main.jsbundle.map",
		];
		argv.extend_from_slice(extra);
		Args::try_parse_from(argv)
	}

	#[test]
	fn verify_cli() {
		Args::command().debug_assert();
	}

	#[test]
	fn defaults_apply() {
		let args = parse(&["--api-key", "k"]).unwrap();
		assert_eq!(args.minified_url, "main.jsbundle");
		assert!(!args.upload_sources);
		assert!(!args.dry_run);
		assert_eq!(args.log_level, LogLevel::Warn);
		assert_eq!(args.project_root, None);
	}

	#[test]
	fn required_files_are_enforced() {
		let err = Args::try_parse_from(["sourcemap-upload", "--source-map", "a.map"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
	}

	#[test]
	fn unknown_flags_are_rejected() {
		let err = parse(&["--bogus"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::UnknownArgument);
	}

	#[test]
	fn residual_arguments_are_rejected() {
		assert!(parse(&["stray"]).is_err());
	}

	#[test]
	fn help_is_not_a_failure() {
		let err = Args::try_parse_from(["sourcemap-upload", "--help"]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::DisplayHelp);
		assert_eq!(err.exit_code(), 0);
	}

	#[test]
	fn inputs_carry_flags() {
		let args = parse(&[
			"--code-bundle-id",
			"cb-1",
			"--project-root",
			"/proj",
			"--upload-sources",
			"--minified-url",
			"index.android.bundle",
		])
		.unwrap();
		let inputs = ConfigInputs::from(&args);
		assert_eq!(inputs.code_bundle_id.as_deref(), Some("cb-1"));
		assert_eq!(inputs.project_root, Some(PathBuf::from("/proj")));
		assert_eq!(inputs.minified_url.as_deref(), Some("index.android.bundle"));
		assert!(inputs.upload_sources);
	}

	#[test]
	fn usage_errors_get_usage_status() {
		let err = anyhow::Error::new(ConfigError::missing_property(
			"bugsnagApiKey",
			"--api-key",
			"/proj/package.json",
		))
		.context("resolving configuration");
		assert_eq!(exit_status(&err), USAGE_EXIT);

		let other = anyhow::Error::new(ConfigError::ManifestNotFound {
			path: "/proj/package.json".into(),
		});
		assert_eq!(exit_status(&other), 1);
		assert_eq!(exit_status(&anyhow::anyhow!("network down")), 1);
	}

	#[cfg(unix)]
	#[test]
	fn prepare_trims_and_collects_sources() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path();
		std::fs::write(root.join("main.jsbundle"), "x").unwrap();
		std::fs::write(
			root.join("package.json"),
			r#"{"version":"5.0.0","bugsnagApiKey":"manifest-key"}"#,
		)
		.unwrap();
		std::fs::create_dir(root.join("src")).unwrap();
		std::fs::write(root.join("src/a.js"), "a").unwrap();
		let map = serde_json::json!({
			"version": 3,
			"sources": [root.join("src/a.js").to_string_lossy(), root.join("src/gone.js").to_string_lossy()],
			"mappings": "AAAA"
		});
		std::fs::write(root.join("main.jsbundle.map"), map.to_string()).unwrap();

		let args = parse(&["--upload-sources"]).unwrap();
		let (config, payload) = prepare(&args, root).unwrap();

		assert_eq!(config.version, VersionIdentifier::AppVersion("5.0.0".into()));
		assert_eq!(
			payload.get("sourceMap"),
			Some(&PayloadValue::Json(
				r#"{"version":3,"sources":["src/a.js","src/gone.js"],"mappings":"AAAA"}"#.into()
			))
		);
		assert!(payload.contains("src/a.js"));
		assert!(!payload.contains("src/gone.js"));
		assert!(!payload.contains("codeBundleId"));
	}

	#[cfg(unix)]
	#[test]
	fn prepare_reports_missing_api_key_as_usage() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path();
		std::fs::write(root.join("main.jsbundle"), "x").unwrap();
		std::fs::write(root.join("main.jsbundle.map"), r#"{"version":3}"#).unwrap();
		std::fs::write(root.join("package.json"), r#"{"version":"1.0.0"}"#).unwrap();

		let mut args = parse(&[]).unwrap();
		args.api_key = None;
		let err = prepare(&args, root).unwrap_err();

		assert_eq!(exit_status(&err), USAGE_EXIT);
		assert!(format!("{err:#}").contains("--api-key"));
	}

	#[cfg(unix)]
	#[test]
	fn prepare_reports_malformed_source_map() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path();
		std::fs::write(root.join("main.jsbundle"), "x").unwrap();
		std::fs::write(root.join("main.jsbundle.map"), "{oops").unwrap();

		let args = parse(&["--api-key", "k", "--app-version", "1"]).unwrap();
		let err = prepare(&args, root).unwrap_err();

		assert_eq!(exit_status(&err), 1);
		let message = format!("{err:#}");
		assert!(message.contains("not valid JSON"));
		assert_eq!(
			message.matches("key must be a string").count(),
			1,
			"parser detail repeated: {message}"
		);
	}

	#[cfg(unix)]
	#[test]
	fn dry_run_lists_every_field_with_key_redacted() {
		let dir = tempfile::tempdir().unwrap();
		let root = dir.path();
		std::fs::write(root.join("main.jsbundle"), "x").unwrap();
		std::fs::write(root.join("main.jsbundle.map"), r#"{"version":3,"sources":[]}"#).unwrap();

		let args = parse(&["--api-key", "top-secret-key", "--app-version", "2.1.0", "--dry-run"]).unwrap();
		let (_, payload) = prepare(&args, root).unwrap();

		let mut out = Vec::new();
		write_dry_run(&payload, &mut out).unwrap();
		let printed = String::from_utf8(out).unwrap();

		assert_eq!(printed.lines().count(), payload.len());
		for (name, _) in payload.iter() {
			assert!(printed.contains(&format!("{name}: ")), "{name} not listed: {printed}");
		}
		assert!(printed.contains("apiKey: [REDACTED]"));
		assert!(printed.contains("appVersion: 2.1.0"));
		assert!(printed.contains("minifiedUrl: main.jsbundle"));
		assert!(!printed.contains("top-secret-key"));
	}
}
