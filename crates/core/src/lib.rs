//! Rust client for Appium/WebDriver mobile automation.
//!
//! A [`Driver`] owns one remote session. Elements found through it are
//! lightweight handles that borrow nothing and stay valid until the screen
//! changes under them.
//!
//! ```ignore
//! use droid::{By, Capabilities, Driver, KeyCode};
//!
//! let caps = Capabilities::android().device_name("emulator-5554");
//! let driver = Driver::start(droid::DEFAULT_ENDPOINT, &caps).await?;
//! let field = driver.wait(Duration::from_secs(10)).presence_of(&By::class_name("android.widget.EditText")).await?;
//! field.send_keys("hello").await?;
//! driver.press_keycode(KeyCode::BACK).await?;
//! driver.quit().await?;
//! ```

mod driver;
mod element;
mod wait;

#[cfg(feature = "testing")]
pub mod testing;

pub use driver::Driver;
pub use droid_protocol::{By, Capabilities, DEFAULT_ENDPOINT, KeyCode};
pub use droid_runtime::{Connection, Error, Result, Wait};
pub use element::Element;
pub use wait::DriverWait;
