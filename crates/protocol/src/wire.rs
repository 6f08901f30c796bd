//! Response envelopes and request bodies shared by all endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// W3C web element identifier key.
pub const ELEMENT_KEY: &str = "element-6066-11e4-a4ce-4e5f-8d4b-c6f9d0e3a0c9";

/// Every WebDriver response wraps its payload in `{"value": ...}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
	pub value: T,
}

/// Reference to a remote element.
///
/// Older JSONWP servers use the `ELEMENT` key; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementRef {
	#[serde(rename = "element-6066-11e4-a4ce-4e5f-8d4b-c6f9d0e3a0c9", alias = "ELEMENT")]
	pub id: String,
}

/// Payload of `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionResponse {
	pub session_id: String,
	#[serde(default)]
	pub capabilities: Value,
}

/// Error payload returned in place of a value.
///
/// `error` is the W3C error code, e.g. `"no such element"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
	pub error: String,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stacktrace: Option<String>,
}

impl WireError {
	pub const NO_SUCH_ELEMENT: &'static str = "no such element";
	pub const INVALID_SESSION_ID: &'static str = "invalid session id";
	pub const TIMEOUT: &'static str = "timeout";

	/// Extracts an error payload from a response value, if it is one.
	pub fn from_value(value: &Value) -> Option<Self> {
		let obj = value.as_object()?;
		obj.get("error")?.as_str()?;
		serde_json::from_value(value.clone()).ok()
	}
}

/// Body of `POST /session/{id}/element/{eid}/value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendKeys {
	pub text: String,
	/// Per-character form for servers that predate the `text` field.
	pub value: Vec<String>,
}

impl SendKeys {
	pub fn new(text: &str) -> Self {
		Self {
			text: text.to_string(),
			value: text.chars().map(String::from).collect(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn element_ref_accepts_w3c_and_legacy_keys() {
		let w3c: ElementRef = serde_json::from_value(serde_json::json!({ ELEMENT_KEY: "abc" })).unwrap();
		let legacy: ElementRef = serde_json::from_str(r#"{"ELEMENT":"abc"}"#).unwrap();
		assert_eq!(w3c, legacy);
		assert_eq!(serde_json::to_value(&w3c).unwrap()[ELEMENT_KEY], "abc");
	}

	#[test]
	fn wire_error_detected_only_on_error_objects() {
		let err = serde_json::json!({ "error": "no such element", "message": "gone", "stacktrace": "" });
		let parsed = WireError::from_value(&err).unwrap();
		assert_eq!(parsed.error, WireError::NO_SUCH_ELEMENT);
		assert_eq!(parsed.message, "gone");

		assert!(WireError::from_value(&serde_json::json!(null)).is_none());
		assert!(WireError::from_value(&serde_json::json!({ ELEMENT_KEY: "abc" })).is_none());
	}

	#[test]
	fn new_session_response_parses() {
		let resp: Envelope<NewSessionResponse> = serde_json::from_str(
			r#"{"value":{"sessionId":"s-1","capabilities":{"platformName":"Android"}}}"#,
		)
		.unwrap();
		assert_eq!(resp.value.session_id, "s-1");
		assert_eq!(resp.value.capabilities["platformName"], "Android");
	}

	#[test]
	fn send_keys_carries_text_and_chars() {
		let body = serde_json::to_value(SendKeys::new("ab")).unwrap();
		assert_eq!(body, serde_json::json!({ "text": "ab", "value": ["a", "b"] }));
	}
}
