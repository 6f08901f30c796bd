//! Wire types for talking to a WebDriver/Appium automation server.
//!
//! Everything here is plain serde data. Transport lives in `droid-runtime`,
//! the typed session API in `droid`.

pub mod capabilities;
pub mod keycode;
pub mod locator;
pub mod wire;

pub use capabilities::{Capabilities, NewSessionRequest};
pub use keycode::{KeyCode, PressKeyCode};
pub use locator::By;
pub use wire::{ELEMENT_KEY, ElementRef, Envelope, NewSessionResponse, SendKeys, WireError};

/// Default automation server endpoint (Appium's standard local port).
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:4723";
