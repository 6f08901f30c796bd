//! Resolved configuration for the signup scenario.
//!
//! [`SignupConfig::default`] reproduces the fixed values the flow was written
//! against; the CLI only overrides what the user passes explicitly.

use std::path::PathBuf;
use std::time::Duration;

use droid::{Capabilities, DEFAULT_ENDPOINT};

pub const DEFAULT_DEVICE: &str = "emulator-5554";
pub const DEFAULT_APP_PACKAGE: &str = "com.example.flutter_application_1";
pub const DEFAULT_APP_ACTIVITY: &str = "com.example.flutter_application_1.MainActivity";
pub const DEFAULT_AUTOMATION: &str = "UiAutomator2";
pub const DEFAULT_NEW_COMMAND_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(25);
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(4);
pub const DEFAULT_FOCUS_DELAY: Duration = Duration::from_secs(1);

pub const DEFAULT_USERNAME: &str = "TestUser123";
pub const DEFAULT_PASSWORD: &str = "password123";
pub const DEFAULT_EMAIL_DOMAIN: &str = "test.com";

pub const CREATE_ACCOUNT_LABEL: &str = "Create Account";
pub const SIGN_UP_LABEL: &str = "Sign Up";
pub const TEXT_FIELD_CLASS: &str = "android.widget.EditText";
pub const BUTTON_CLASS: &str = "android.widget.Button";
pub const DEFAULT_LANDING_MARKER: &str = "CartIcon";
pub const DEFAULT_SCREENSHOT_PATH: &str = "docs/results/auth_test_screenshot.png";

#[derive(Debug, Clone)]
pub struct SignupConfig {
	/// Automation server endpoint.
	pub endpoint: String,
	pub capabilities: Capabilities,

	/// Budget for every presence wait.
	pub wait_timeout: Duration,
	pub poll_interval: Duration,
	/// Pause after leaving the entry screen, before looking for text fields.
	pub settle_delay: Duration,
	/// Pause after each focus change.
	pub focus_delay: Duration,

	pub username: String,
	pub password: String,
	pub email_domain: String,

	pub create_account_label: String,
	pub sign_up_label: String,
	pub text_field_class: String,
	pub button_class: String,
	/// Accessibility id that only exists on the post-signup screen.
	pub landing_marker: String,
	pub screenshot_path: PathBuf,
}

impl Default for SignupConfig {
	fn default() -> Self {
		Self {
			endpoint: DEFAULT_ENDPOINT.to_string(),
			capabilities: default_capabilities(),
			wait_timeout: DEFAULT_WAIT_TIMEOUT,
			poll_interval: droid::Wait::DEFAULT_POLL_INTERVAL,
			settle_delay: DEFAULT_SETTLE_DELAY,
			focus_delay: DEFAULT_FOCUS_DELAY,
			username: DEFAULT_USERNAME.to_string(),
			password: DEFAULT_PASSWORD.to_string(),
			email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
			create_account_label: CREATE_ACCOUNT_LABEL.to_string(),
			sign_up_label: SIGN_UP_LABEL.to_string(),
			text_field_class: TEXT_FIELD_CLASS.to_string(),
			button_class: BUTTON_CLASS.to_string(),
			landing_marker: DEFAULT_LANDING_MARKER.to_string(),
			screenshot_path: PathBuf::from(DEFAULT_SCREENSHOT_PATH),
		}
	}
}

/// Android app launched with reset disabled. Flags override individual
/// fields on top of this.
pub fn default_capabilities() -> Capabilities {
	Capabilities::android()
		.device_name(DEFAULT_DEVICE)
		.app_package(DEFAULT_APP_PACKAGE)
		.app_activity(DEFAULT_APP_ACTIVITY)
		.automation_name(DEFAULT_AUTOMATION)
		.no_reset(true)
		.new_command_timeout(DEFAULT_NEW_COMMAND_TIMEOUT_SECS)
}
