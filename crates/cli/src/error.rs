use thiserror::Error;

use crate::output::{CommandError, ErrorCode};
use crate::scenario::Step;

pub type Result<T> = std::result::Result<T, ScenarioError>;

#[derive(Debug, Error)]
pub enum ScenarioError {
	/// A step whose failure makes the rest of the flow meaningless.
	#[error("Error {}: {message}", .step.action())]
	StepFailed { step: Step, message: String },

	#[error(transparent)]
	Driver(#[from] droid::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Anyhow(#[from] anyhow::Error),

	/// The command already emitted its own failure envelope.
	#[error("output already printed")]
	OutputAlreadyPrinted,
}

impl ScenarioError {
	pub(crate) fn step(step: Step, message: impl Into<String>) -> Self {
		ScenarioError::StepFailed {
			step,
			message: message.into(),
		}
	}

	pub fn is_output_already_printed(&self) -> bool {
		matches!(self, ScenarioError::OutputAlreadyPrinted)
	}

	/// Convert this error to a CommandError for structured output
	pub fn to_command_error(&self) -> CommandError {
		let (code, details) = match self {
			ScenarioError::StepFailed { step, .. } => {
				(ErrorCode::StepFailed, Some(serde_json::json!({ "step": step })))
			}
			ScenarioError::Driver(err) => (classify_driver_error(err), err.stack_trace().map(|s| serde_json::json!({ "stack": s }))),
			ScenarioError::Io(_) => (ErrorCode::IoError, None),
			ScenarioError::Json(_) => (ErrorCode::InternalError, None),
			// Only configuration resolution produces ad-hoc errors.
			ScenarioError::Anyhow(_) => (ErrorCode::InvalidInput, None),
			ScenarioError::OutputAlreadyPrinted => (ErrorCode::InternalError, None),
		};

		CommandError {
			code,
			message: self.to_string(),
			details,
		}
	}
}

fn classify_driver_error(err: &droid::Error) -> ErrorCode {
	match err {
		droid::Error::ConnectionFailed(_) | droid::Error::TransportError(_) => ErrorCode::ConnectionFailed,
		_ if err.is_timeout() => ErrorCode::Timeout,
		_ if err.is_no_such_element() => ErrorCode::ElementNotFound,
		_ if err.is_invalid_session() => ErrorCode::SessionError,
		droid::Error::InvalidArgument(_) => ErrorCode::InvalidInput,
		_ => ErrorCode::InternalError,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn step_failure_message_names_the_action() {
		let err = ScenarioError::step(Step::Username, "No text boxes found!");
		assert_eq!(err.to_string(), "Error typing username: No text boxes found!");

		let cmd = err.to_command_error();
		assert_eq!(cmd.code, ErrorCode::StepFailed);
		assert_eq!(cmd.details.unwrap()["step"], "username");
	}

	#[test]
	fn connection_errors_classified() {
		let err = ScenarioError::from(droid::Error::ConnectionFailed("refused".into()));
		assert_eq!(err.to_command_error().code, ErrorCode::ConnectionFailed);

		let err = ScenarioError::from(droid::Error::Timeout("x".into()));
		assert_eq!(err.to_command_error().code, ErrorCode::Timeout);
	}
}
