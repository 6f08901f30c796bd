//! Android key-codes and the `press_keycode` request body.

use serde::{Deserialize, Serialize};

/// Platform key-code as defined by `android.view.KeyEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
	/// Hardware back; also dismisses the soft keyboard.
	pub const BACK: KeyCode = KeyCode(4);
	/// Moves focus to the next input field.
	pub const TAB: KeyCode = KeyCode(61);
	pub const ENTER: KeyCode = KeyCode(66);

	pub fn code(self) -> u32 {
		self.0
	}

	/// Human-readable name for known codes, used in logs.
	pub fn name(self) -> Option<&'static str> {
		match self {
			Self::BACK => Some("BACK"),
			Self::TAB => Some("TAB"),
			Self::ENTER => Some("ENTER"),
			_ => None,
		}
	}
}

impl std::fmt::Display for KeyCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.name() {
			Some(name) => write!(f, "{name}({})", self.0),
			None => write!(f, "{}", self.0),
		}
	}
}

/// Body of `POST /session/{id}/appium/device/press_keycode`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PressKeyCode {
	pub keycode: KeyCode,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub metastate: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub flags: Option<u32>,
}

impl From<KeyCode> for PressKeyCode {
	fn from(keycode: KeyCode) -> Self {
		Self {
			keycode,
			metastate: None,
			flags: None,
		}
	}
}
