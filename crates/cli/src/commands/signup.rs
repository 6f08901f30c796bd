//! Signup command: one run of the scripted signup flow.

use std::time::Instant;

use tracing::info;

use crate::cli::SignupArgs;
use crate::credentials::Credentials;
use crate::error::{Result, ScenarioError};
use crate::output::{
	Artifact, ArtifactType, CommandResult, DiagnosticLevel, OutputFormat, ResultBuilder, print_result,
};
use crate::scenario::{SignupReport, SignupRun, StepOutcome, run_signup};

pub async fn execute(args: SignupArgs, format: OutputFormat) -> Result<()> {
	let started = Instant::now();
	let config = args.into_config()?;
	let credentials = Credentials::generate(&config, &mut rand::rng());

	let run = run_signup(&config, credentials).await;
	let failed = run.result.is_err();
	let result = signup_result(run, started);
	print_result(&result, format);

	if failed {
		// The envelope above already carries the error and the partial report.
		return Err(ScenarioError::OutputAlreadyPrinted);
	}
	info!(target = "droid", ms = started.elapsed().as_millis() as u64, "signup finished");
	Ok(())
}

/// Builds the output envelope for a finished run. Skipped steps become info
/// diagnostics, warned steps warnings; a saved screenshot becomes an artifact.
pub fn signup_result(run: SignupRun, started: Instant) -> CommandResult<SignupReport> {
	let SignupRun { report, result } = run;
	let mut builder = ResultBuilder::new("signup").started_at(started);

	for record in &report.steps {
		let level = match record.outcome {
			StepOutcome::Skipped { .. } => DiagnosticLevel::Info,
			StepOutcome::Warned { .. } => DiagnosticLevel::Warning,
			_ => continue,
		};
		if let Some(message) = record.outcome.warning() {
			builder = builder.diagnostic(level, record.step.as_str(), message);
		}
	}

	if let Some(path) = &report.screenshot {
		builder = builder.artifact(Artifact {
			artifact_type: ArtifactType::Screenshot,
			path: path.clone(),
			size_bytes: std::fs::metadata(path).ok().map(|m| m.len()),
		});
	}

	if let Err(err) = &result {
		builder = builder.command_error(err.to_command_error());
	}

	builder.data(report).build()
}
