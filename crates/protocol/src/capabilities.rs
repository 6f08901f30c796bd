//! Session capabilities and the W3C new-session request body.
//!
//! Appium requires every non-standard capability to carry the `appium:`
//! vendor prefix. [`Capabilities::to_always_match`] applies it, so callers
//! write plain names (`deviceName`, `noReset`) through the typed setters or
//! [`Capabilities::set`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Vendor prefix for Appium extension capabilities.
pub const APPIUM_PREFIX: &str = "appium:";

/// Capability names defined by W3C WebDriver, sent without a vendor prefix.
const STANDARD_CAPABILITIES: &[&str] = &[
	"browserName",
	"browserVersion",
	"platformName",
	"acceptInsecureCerts",
	"pageLoadStrategy",
	"proxy",
	"setWindowRect",
	"timeouts",
	"strictFileInteractability",
	"unhandledPromptBehavior",
	"webSocketUrl",
];

/// Capabilities describing the device and application a session targets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
	/// Target platform (e.g. `"Android"`).
	pub platform_name: String,

	/// Device identifier as reported by the platform tooling (e.g. `"emulator-5554"`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub device_name: Option<String>,

	/// Package of the application under test.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub app_package: Option<String>,

	/// Activity launched when the session starts.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub app_activity: Option<String>,

	/// Automation engine identifier (e.g. `"UiAutomator2"`).
	#[serde(skip_serializing_if = "Option::is_none")]
	pub automation_name: Option<String>,

	/// Keep application state between sessions.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub no_reset: Option<bool>,

	/// Seconds the server waits for a command before ending the session.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub new_command_timeout: Option<u64>,

	/// Any further capabilities, keyed by unprefixed name.
	#[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
	pub extra: BTreeMap<String, Value>,
}

impl Capabilities {
	/// Android capabilities driven by the UiAutomator2 engine.
	pub fn android() -> Self {
		Self {
			platform_name: "Android".into(),
			automation_name: Some("UiAutomator2".into()),
			..Self::default()
		}
	}

	pub fn device_name(mut self, name: impl Into<String>) -> Self {
		self.device_name = Some(name.into());
		self
	}

	pub fn app_package(mut self, package: impl Into<String>) -> Self {
		self.app_package = Some(package.into());
		self
	}

	pub fn app_activity(mut self, activity: impl Into<String>) -> Self {
		self.app_activity = Some(activity.into());
		self
	}

	pub fn automation_name(mut self, name: impl Into<String>) -> Self {
		self.automation_name = Some(name.into());
		self
	}

	pub fn no_reset(mut self, no_reset: bool) -> Self {
		self.no_reset = Some(no_reset);
		self
	}

	pub fn new_command_timeout(mut self, secs: u64) -> Self {
		self.new_command_timeout = Some(secs);
		self
	}

	/// Sets an arbitrary capability. Typed fields win over `extra` on conflict.
	pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.extra.insert(name.into(), value.into());
		self
	}

	/// Flattens into the `alwaysMatch` object, vendor-prefixing where required.
	pub fn to_always_match(&self) -> Map<String, Value> {
		let mut out = Map::new();

		for (name, value) in &self.extra {
			out.insert(qualify(name), value.clone());
		}

		out.insert("platformName".into(), Value::String(self.platform_name.clone()));

		let typed: [(&str, Option<Value>); 6] = [
			("deviceName", self.device_name.clone().map(Value::String)),
			("appPackage", self.app_package.clone().map(Value::String)),
			("appActivity", self.app_activity.clone().map(Value::String)),
			("automationName", self.automation_name.clone().map(Value::String)),
			("noReset", self.no_reset.map(Value::Bool)),
			("newCommandTimeout", self.new_command_timeout.map(Value::from)),
		];
		for (name, value) in typed {
			if let Some(value) = value {
				out.insert(qualify(name), value);
			}
		}

		out
	}

	/// Builds the W3C new-session request body.
	pub fn to_session_request(&self) -> NewSessionRequest {
		NewSessionRequest {
			capabilities: CapabilityRequest {
				always_match: self.to_always_match(),
				first_match: vec![Map::new()],
			},
		}
	}
}

fn qualify(name: &str) -> String {
	if name.contains(':') || STANDARD_CAPABILITIES.contains(&name) {
		name.to_string()
	} else {
		format!("{APPIUM_PREFIX}{name}")
	}
}

/// Body of `POST /session`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionRequest {
	pub capabilities: CapabilityRequest,
}

/// W3C capability matching block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilityRequest {
	pub always_match: Map<String, Value>,
	pub first_match: Vec<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn android_defaults() {
		let caps = Capabilities::android();
		assert_eq!(caps.platform_name, "Android");
		assert_eq!(caps.automation_name.as_deref(), Some("UiAutomator2"));
	}

	#[test]
	fn always_match_prefixes_vendor_capabilities() {
		let caps = Capabilities::android()
			.device_name("emulator-5554")
			.app_package("com.example.app")
			.no_reset(true)
			.new_command_timeout(300);

		let map = caps.to_always_match();
		assert_eq!(map["platformName"], "Android");
		assert_eq!(map["appium:deviceName"], "emulator-5554");
		assert_eq!(map["appium:appPackage"], "com.example.app");
		assert_eq!(map["appium:automationName"], "UiAutomator2");
		assert_eq!(map["appium:noReset"], true);
		assert_eq!(map["appium:newCommandTimeout"], 300);
		assert!(!map.contains_key("appium:appActivity"));
		assert!(!map.contains_key("deviceName"));
	}

	#[test]
	fn extra_capabilities_keep_existing_prefix_and_standard_names() {
		let caps = Capabilities::android()
			.set("autoGrantPermissions", true)
			.set("appium:language", "en")
			.set("acceptInsecureCerts", true);

		let map = caps.to_always_match();
		assert_eq!(map["appium:autoGrantPermissions"], true);
		assert_eq!(map["appium:language"], "en");
		assert_eq!(map["acceptInsecureCerts"], true);
	}

	#[test]
	fn typed_fields_override_extra() {
		let caps = Capabilities::android().set("deviceName", "other").device_name("emulator-5554");
		assert_eq!(caps.to_always_match()["appium:deviceName"], "emulator-5554");
	}

	#[test]
	fn session_request_shape() {
		let json = serde_json::to_value(Capabilities::android().to_session_request()).unwrap();
		assert_eq!(json["capabilities"]["alwaysMatch"]["platformName"], "Android");
		assert_eq!(json["capabilities"]["firstMatch"], serde_json::json!([{}]));
	}
}
