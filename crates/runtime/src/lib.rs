//! droid runtime - connection, errors and polling
//!
//! Low-level plumbing between the typed session API (`droid`) and a remote
//! WebDriver/Appium server:
//!
//! - **Connection**: HTTP request/response with `{"value": ...}` envelope handling
//! - **Error**: transport, protocol, and remote W3C errors in one enum
//! - **Wait**: bounded polling for conditions evaluated on the server
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │    droid     │  Driver / Element handles
//! └──────┬───────┘
//!        │ paths + JSON bodies
//! ┌──────▼───────┐
//! │ droid-runtime│  This crate
//! └──────┬───────┘
//!        │ HTTP (reqwest)
//! ┌──────▼───────┐
//! │ Appium server│
//! └──────────────┘
//! ```

pub mod connection;
pub mod error;
pub mod wait;

pub use connection::{Connection, Method};
pub use error::{Error, Result};
pub use wait::Wait;
