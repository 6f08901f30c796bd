//! Error types for the droid runtime.

use droid_protocol::WireError;
use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the automation server.
#[derive(Debug, Error)]
pub enum Error {
	/// The server could not be reached or the request never completed.
	#[error("Failed to connect to automation server: {0}. Is Appium running?")]
	ConnectionFailed(String),

	/// Reading the response body failed.
	#[error("Transport error: {0}")]
	TransportError(String),

	/// The server answered with something that is not a WebDriver envelope.
	#[error("Protocol error: {0}")]
	ProtocolError(String),

	/// Error reported by the automation server.
	#[error("{name}: {message}")]
	Remote {
		/// W3C error code (e.g. "no such element", "invalid session id")
		name: String,
		/// Human-readable error message
		message: String,
		/// Server-side stack trace, when provided
		stack: Option<String>,
	},

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A polled condition did not hold before the deadline.
	#[error("Timeout: {0}")]
	Timeout(String),

	/// Invalid argument provided to method.
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

impl From<WireError> for Error {
	fn from(err: WireError) -> Self {
		Error::Remote {
			name: err.error,
			message: err.message,
			stack: err.stacktrace.filter(|s| !s.is_empty()),
		}
	}
}

impl Error {
	/// Returns the W3C error code if this is a Remote error.
	pub fn error_name(&self) -> Option<&str> {
		match self {
			Error::Remote { name, .. } => Some(name),
			_ => None,
		}
	}

	/// Returns the stack trace if this is a Remote error with a stack.
	pub fn stack_trace(&self) -> Option<&str> {
		match self {
			Error::Remote { stack, .. } => stack.as_deref(),
			_ => None,
		}
	}

	/// Returns true if the server found no element for a locator.
	pub fn is_no_such_element(&self) -> bool {
		self.error_name() == Some(WireError::NO_SUCH_ELEMENT)
	}

	/// Returns true if this is a timeout error.
	pub fn is_timeout(&self) -> bool {
		match self {
			Error::Timeout(_) => true,
			Error::Remote { name, .. } => name == WireError::TIMEOUT,
			_ => false,
		}
	}

	/// Returns true if the session no longer exists on the server.
	pub fn is_invalid_session(&self) -> bool {
		self.error_name() == Some(WireError::INVALID_SESSION_ID)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn remote(name: &str) -> Error {
		Error::from(WireError {
			error: name.into(),
			message: "msg".into(),
			stacktrace: Some(String::new()),
		})
	}

	#[test]
	fn wire_error_converts_to_remote() {
		let err = remote("no such element");
		assert!(err.is_no_such_element());
		assert!(!err.is_timeout());
		assert_eq!(err.stack_trace(), None);
		assert_eq!(err.to_string(), "no such element: msg");
	}

	#[test]
	fn timeout_predicates() {
		assert!(Error::Timeout("x".into()).is_timeout());
		assert!(remote("timeout").is_timeout());
		assert!(remote("invalid session id").is_invalid_session());
	}
}
