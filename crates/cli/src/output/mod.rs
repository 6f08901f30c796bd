//! Result envelope printed by every command.
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "ok": true,
//!   "command": "signup",
//!   "data": { "email": "user4821@test.com", "steps": [ ... ] },
//!   "timings": { "durationMs": 9123 },
//!   "artifacts": [{ "type": "screenshot", "path": "docs/results/auth_test_screenshot.png" }],
//!   "diagnostics": [{ "level": "info", "message": "...", "source": "create_account" }]
//! }
//! ```
//!
//! A failed run sets `ok` to false and fills `error`, but keeps `data` so
//! the steps that did run are still visible.


use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
	/// Step-by-step report for humans
	#[default]
	Text,
	/// Pretty-printed envelope
	Json,
	/// One compact envelope per line
	Ndjson,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		<Self as ValueEnum>::from_str(s, true)
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.to_possible_value() {
			Some(value) => f.write_str(value.get_name()),
			None => Ok(()),
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub schema_version: u32,
	pub ok: bool,
	pub command: String,

	/// Present on failure too when the command got partway.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub artifacts: Vec<Artifact>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	/// Failing step, server stack trace, and similar.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Stable codes for scripts that branch on failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Text entry into a required field failed
	StepFailed,
	/// No automation server at the endpoint
	ConnectionFailed,
	ElementNotFound,
	Timeout,
	IoError,
	/// Server rejected or lost the session
	SessionError,
	InvalidInput,
	InternalError,
}

impl ErrorCode {
	pub fn as_str(self) -> &'static str {
		match self {
			ErrorCode::StepFailed => "STEP_FAILED",
			ErrorCode::ConnectionFailed => "CONNECTION_FAILED",
			ErrorCode::ElementNotFound => "ELEMENT_NOT_FOUND",
			ErrorCode::Timeout => "TIMEOUT",
			ErrorCode::IoError => "IO_ERROR",
			ErrorCode::SessionError => "SESSION_ERROR",
			ErrorCode::InvalidInput => "INVALID_INPUT",
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(elapsed: Duration) -> Self {
		Self {
			duration_ms: elapsed.as_millis() as u64,
		}
	}
}

/// A file written during the command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
	#[serde(rename = "type")]
	pub artifact_type: ArtifactType,
	pub path: PathBuf,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
	Screenshot,
}

impl ArtifactType {
	fn label(self) -> &'static str {
		match self {
			ArtifactType::Screenshot => "screenshot",
		}
	}
}

/// Something a best-effort step wants the reader to know.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
	pub level: DiagnosticLevel,
	pub message: String,
	/// Step name the diagnostic belongs to.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
	/// A step was skipped on a harmless assumption.
	Info,
	/// A best-effort step failed and the run carried on.
	Warning,
}

impl DiagnosticLevel {
	fn label(self) -> &'static str {
		match self {
			DiagnosticLevel::Info => "info",
			DiagnosticLevel::Warning => "warning",
		}
	}
}

/// Text rendering of command data, used by [`OutputFormat::Text`].
pub trait RenderText {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()>;
}

impl RenderText for serde_json::Value {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		let pretty = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
		writeln!(out, "{pretty}")
	}
}

pub struct ResultBuilder<T: Serialize> {
	command: String,
	started: Instant,
	data: Option<T>,
	error: Option<CommandError>,
	artifacts: Vec<Artifact>,
	diagnostics: Vec<Diagnostic>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			started: Instant::now(),
			data: None,
			error: None,
			artifacts: Vec::new(),
			diagnostics: Vec::new(),
		}
	}

	/// Measures duration from `started` rather than from builder creation.
	pub fn started_at(mut self, started: Instant) -> Self {
		self.started = started;
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn command_error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn artifact(mut self, artifact: Artifact) -> Self {
		self.artifacts.push(artifact);
		self
	}

	pub fn diagnostic(mut self, level: DiagnosticLevel, source: &str, message: impl Into<String>) -> Self {
		self.diagnostics.push(Diagnostic {
			level,
			message: message.into(),
			source: Some(source.to_string()),
		});
		self
	}

	pub fn build(self) -> CommandResult<T> {
		CommandResult {
			schema_version: SCHEMA_VERSION,
			ok: self.error.is_none() && self.data.is_some(),
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(self.started.elapsed().into()),
			artifacts: self.artifacts,
			diagnostics: self.diagnostics,
		}
	}
}

/// Prints `result` to stdout. Write failures (a closed pipe) are ignored.
pub fn print_result<T: Serialize + RenderText>(result: &CommandResult<T>, format: OutputFormat) {
	let mut stdout = io::stdout().lock();
	let _ = write_result(result, format, &mut stdout);
}

pub fn write_result<T: Serialize + RenderText>(
	result: &CommandResult<T>,
	format: OutputFormat,
	out: &mut dyn Write,
) -> io::Result<()> {
	match format {
		OutputFormat::Json => {
			let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
			writeln!(out, "{json}")
		}
		OutputFormat::Ndjson => {
			let json = serde_json::to_string(result).map_err(io::Error::other)?;
			writeln!(out, "{json}")
		}
		OutputFormat::Text => write_result_text(result, out),
	}
}

pub fn write_result_text<T: Serialize + RenderText>(result: &CommandResult<T>, out: &mut dyn Write) -> io::Result<()> {
	if let Some(data) = &result.data {
		data.render_text(out)?;
	}
	if let Some(error) = &result.error {
		writeln!(out, "Error [{}]: {}", error.code, error.message)?;
	}
	for diag in &result.diagnostics {
		match &diag.source {
			Some(source) => writeln!(out, "[{}:{source}] {}", diag.level.label(), diag.message)?,
			None => writeln!(out, "[{}] {}", diag.level.label(), diag.message)?,
		}
	}
	for artifact in &result.artifacts {
		writeln!(out, "Saved {}: {}", artifact.artifact_type.label(), artifact.path.display())?;
	}
	if let Some(timings) = &result.timings {
		writeln!(out, "Completed in {}ms", timings.duration_ms)?;
	}
	Ok(())
}

pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error [{}]: {}", error.code, error.message);
}
