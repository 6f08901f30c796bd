//! Element location strategies.

use serde::{Deserialize, Serialize};

/// How to find an element, serialized as the `{"using", "value"}` body of
/// `POST /session/{id}/element(s)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "using", content = "value")]
pub enum By {
	/// Exact match on the accessibility identifier (content-desc on Android).
	#[serde(rename = "accessibility id")]
	AccessibilityId(String),
	/// Exact match on the widget class, e.g. `android.widget.EditText`.
	#[serde(rename = "class name")]
	ClassName(String),
	/// Native resource id.
	#[serde(rename = "id")]
	Id(String),
	#[serde(rename = "xpath")]
	XPath(String),
	/// Raw UiAutomator selector expression.
	#[serde(rename = "-android uiautomator")]
	AndroidUiAutomator(String),
}

impl By {
	pub fn accessibility_id(id: impl Into<String>) -> Self {
		Self::AccessibilityId(id.into())
	}

	pub fn class_name(class: impl Into<String>) -> Self {
		Self::ClassName(class.into())
	}

	/// Accessibility description containing `needle`.
	pub fn description_contains(needle: &str) -> Self {
		Self::AndroidUiAutomator(format!(
			"new UiSelector().descriptionContains(\"{}\")",
			escape_selector(needle)
		))
	}

	/// Visible text containing `needle`.
	pub fn text_contains(needle: &str) -> Self {
		Self::AndroidUiAutomator(format!(
			"new UiSelector().textContains(\"{}\")",
			escape_selector(needle)
		))
	}

	/// Wire name of the strategy.
	pub fn strategy(&self) -> &'static str {
		match self {
			Self::AccessibilityId(_) => "accessibility id",
			Self::ClassName(_) => "class name",
			Self::Id(_) => "id",
			Self::XPath(_) => "xpath",
			Self::AndroidUiAutomator(_) => "-android uiautomator",
		}
	}

	pub fn value(&self) -> &str {
		match self {
			Self::AccessibilityId(v)
			| Self::ClassName(v)
			| Self::Id(v)
			| Self::XPath(v)
			| Self::AndroidUiAutomator(v) => v,
		}
	}
}

impl std::fmt::Display for By {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}={}", self.strategy(), self.value())
	}
}

/// Escapes a literal for embedding in a quoted UiSelector argument.
fn escape_selector(s: &str) -> String {
	s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_using_value_pair() {
		let json = serde_json::to_value(By::class_name("android.widget.EditText")).unwrap();
		assert_eq!(
			json,
			serde_json::json!({ "using": "class name", "value": "android.widget.EditText" })
		);
	}

	#[test]
	fn accessibility_id_strategy_name() {
		let json = serde_json::to_value(By::accessibility_id("CartIcon")).unwrap();
		assert_eq!(json["using"], "accessibility id");
	}

	#[test]
	fn description_contains_builds_uiselector() {
		let by = By::description_contains("Create Account");
		assert_eq!(by.strategy(), "-android uiautomator");
		assert_eq!(by.value(), r#"new UiSelector().descriptionContains("Create Account")"#);
	}

	#[test]
	fn text_contains_escapes_quotes() {
		let by = By::text_contains(r#"say "hi""#);
		assert_eq!(by.value(), r#"new UiSelector().textContains("say \"hi\"")"#);
	}

	#[test]
	fn deserializes_from_wire() {
		let by: By = serde_json::from_str(r#"{"using":"accessibility id","value":"CartIcon"}"#).unwrap();
		assert_eq!(by, By::accessibility_id("CartIcon"));
	}
}
