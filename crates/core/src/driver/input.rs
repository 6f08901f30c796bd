//! Key-code injection for [`Driver`].

use droid_protocol::{KeyCode, PressKeyCode};
use droid_runtime::{Method, Result};
use tracing::debug;

use super::Driver;

impl Driver {
	/// Sends a platform key event, e.g. [`KeyCode::TAB`] to advance focus.
	pub async fn press_keycode(&self, keycode: KeyCode) -> Result<()> {
		self.press(PressKeyCode::from(keycode)).await
	}

	/// Sends a key event with explicit meta state and flags.
	pub async fn press(&self, event: PressKeyCode) -> Result<()> {
		debug!(target = "droid", keycode = %event.keycode, "press keycode");
		self.connection()
			.send_no_result(
				Method::POST,
				&self.path("appium/device/press_keycode"),
				Some(serde_json::to_value(&event)?),
			)
			.await
	}
}
