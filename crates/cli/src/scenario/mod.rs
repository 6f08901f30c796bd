//! Scripted UI scenarios and their run reports.

pub mod signup;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::output::RenderText;

pub use signup::{SignupRun, run_signup};

/// Steps of the signup flow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
	CreateAccount,
	Username,
	FocusEmail,
	Email,
	FocusPassword,
	Password,
	SignUp,
	VerifyHome,
}

impl Step {
	pub const ALL: [Step; 8] = [
		Step::CreateAccount,
		Step::Username,
		Step::FocusEmail,
		Step::Email,
		Step::FocusPassword,
		Step::Password,
		Step::SignUp,
		Step::VerifyHome,
	];

	/// One-based position in the flow.
	pub fn number(self) -> usize {
		Self::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
	}

	pub fn title(self) -> &'static str {
		match self {
			Step::CreateAccount => "Navigate to Signup",
			Step::Username => "Type Username",
			Step::FocusEmail => "Switch Focus to Email",
			Step::Email => "Type Email",
			Step::FocusPassword => "Switch Focus to Password",
			Step::Password => "Type Password",
			Step::SignUp => "Click Sign Up",
			Step::VerifyHome => "Verify Home",
		}
	}

	/// Verb phrase used in failure messages ("Error typing username: ...").
	pub fn action(self) -> &'static str {
		match self {
			Step::CreateAccount => "opening signup",
			Step::Username => "typing username",
			Step::FocusEmail | Step::FocusPassword => "advancing focus",
			Step::Email => "typing email",
			Step::Password => "typing password",
			Step::SignUp => "clicking sign up",
			Step::VerifyHome => "verifying home",
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Step::CreateAccount => "create_account",
			Step::Username => "username",
			Step::FocusEmail => "focus_email",
			Step::Email => "email",
			Step::FocusPassword => "focus_password",
			Step::Password => "password",
			Step::SignUp => "sign_up",
			Step::VerifyHome => "verify_home",
		}
	}

	/// Whether a failure of this step ends the run.
	pub fn is_fatal(self) -> bool {
		matches!(self, Step::Username | Step::Email | Step::Password)
	}
}

impl std::fmt::Display for Step {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What happened in one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
	/// Completed. `via` names the locator tier when a chain was involved.
	Done {
		#[serde(skip_serializing_if = "Option::is_none")]
		via: Option<String>,
	},
	/// Nothing to do; the flow continues on an assumption.
	Skipped { reason: String },
	/// Best-effort step failed; the flow continues.
	Warned { reason: String },
	/// Fatal step failed; the run stops here.
	Failed { reason: String },
}

impl StepOutcome {
	pub fn via(label: impl Into<String>) -> Self {
		StepOutcome::Done {
			via: Some(label.into()),
		}
	}

	/// Message worth surfacing as a diagnostic, if any.
	pub fn warning(&self) -> Option<&str> {
		match self {
			StepOutcome::Skipped { reason } | StepOutcome::Warned { reason } => Some(reason),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
	pub step: Step,
	#[serde(flatten)]
	pub outcome: StepOutcome,
	pub elapsed_ms: u64,
}

/// Everything a signup run did, complete or not.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupReport {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub session_id: Option<String>,
	pub username: String,
	pub email: String,
	pub steps: Vec<StepRecord>,
	pub landing_reached: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub screenshot: Option<PathBuf>,
}

impl SignupReport {
	pub fn record(&mut self, step: Step, outcome: StepOutcome, elapsed: Duration) {
		self.steps.push(StepRecord {
			step,
			outcome,
			elapsed_ms: elapsed.as_millis() as u64,
		});
	}

	pub fn outcome(&self, step: Step) -> Option<&StepOutcome> {
		self.steps.iter().find(|r| r.step == step).map(|r| &r.outcome)
	}
}

impl RenderText for SignupReport {
	fn render_text(&self, out: &mut dyn Write) -> io::Result<()> {
		for record in &self.steps {
			let step = record.step;
			let detail = match &record.outcome {
				StepOutcome::Done { via: Some(via) } => format!("ok (via {via})"),
				StepOutcome::Done { via: None } => "ok".to_string(),
				StepOutcome::Skipped { reason } => format!("skipped: {reason}"),
				StepOutcome::Warned { reason } => format!("warning: {reason}"),
				StepOutcome::Failed { reason } => format!("FAILED: {reason}"),
			};
			writeln!(out, "STEP {}: {} -> {detail}", step.number(), step.title())?;
		}
		writeln!(out, "username: {}", self.username)?;
		writeln!(out, "email: {}", self.email)?;
		if self.landing_reached {
			writeln!(out, "Home Screen Reached!")?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn only_entry_steps_are_fatal() {
		let fatal: Vec<_> = Step::ALL.iter().filter(|s| s.is_fatal()).copied().collect();
		assert_eq!(fatal, [Step::Username, Step::Email, Step::Password]);
	}

	#[test]
	fn step_numbers_follow_flow_order() {
		assert_eq!(Step::CreateAccount.number(), 1);
		assert_eq!(Step::VerifyHome.number(), 8);
	}

	#[test]
	fn step_serializes_like_display() {
		for step in Step::ALL {
			assert_eq!(serde_json::to_value(step).unwrap(), step.as_str());
		}
	}

	#[test]
	fn record_serializes_flat() {
		let mut report = SignupReport::default();
		report.record(Step::SignUp, StepOutcome::via("last button"), Duration::from_millis(12));
		let json = serde_json::to_value(&report.steps[0]).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "step": "sign_up", "status": "done", "via": "last button", "elapsedMs": 12 })
		);
	}

	#[test]
	fn warnings_cover_skipped_and_warned() {
		let mut report = SignupReport::default();
		report.record(
			Step::CreateAccount,
			StepOutcome::Skipped {
				reason: "already on signup".into(),
			},
			Duration::ZERO,
		);
		report.record(Step::Username, StepOutcome::via("first of 3 text fields"), Duration::ZERO);
		report.record(
			Step::VerifyHome,
			StepOutcome::Warned {
				reason: "timed out".into(),
			},
			Duration::ZERO,
		);

		let warnings: Vec<_> = report
			.steps
			.iter()
			.filter_map(|r| r.outcome.warning().map(|w| (r.step, w)))
			.collect();
		assert_eq!(
			warnings,
			[(Step::CreateAccount, "already on signup"), (Step::VerifyHome, "timed out")]
		);
	}

	#[test]
	fn text_render_numbers_steps() {
		let mut report = SignupReport {
			username: "TestUser123".into(),
			email: "user1000@test.com".into(),
			landing_reached: true,
			..SignupReport::default()
		};
		report.record(Step::CreateAccount, StepOutcome::via("text"), Duration::ZERO);

		let mut buf = Vec::new();
		report.render_text(&mut buf).unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert!(text.contains("STEP 1: Navigate to Signup -> ok (via text)"));
		assert!(text.contains("email: user1000@test.com"));
		assert!(text.contains("Home Screen Reached!"));
	}
}
