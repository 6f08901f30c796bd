//! [`Element`] handles returned by locate calls.

use std::sync::Arc;

use droid_protocol::SendKeys;
use droid_runtime::{Connection, Method, Result};
use tracing::debug;

/// A remote element within a session.
///
/// Handles are not re-resolved: once the screen changes the server may
/// report them stale.
#[derive(Clone)]
pub struct Element {
	conn: Connection,
	session_path: Arc<str>,
	id: String,
}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Element").field("id", &self.id).finish()
	}
}

impl Element {
	pub(crate) fn new(conn: Connection, session_path: Arc<str>, id: String) -> Self {
		Self { conn, session_path, id }
	}

	/// Server-assigned element id.
	pub fn id(&self) -> &str {
		&self.id
	}

	fn path(&self, action: &str) -> String {
		format!("{}/element/{}/{action}", self.session_path, self.id)
	}

	pub async fn click(&self) -> Result<()> {
		debug!(target = "droid", element = %self.id, "click");
		self.conn.send_no_result(Method::POST, &self.path("click"), None).await
	}

	/// Types `text` into the element.
	pub async fn send_keys(&self, text: &str) -> Result<()> {
		debug!(target = "droid", element = %self.id, chars = text.chars().count(), "send keys");
		self.conn
			.send_no_result(Method::POST, &self.path("value"), Some(serde_json::to_value(SendKeys::new(text))?))
			.await
	}

	/// Visible text of the element.
	pub async fn text(&self) -> Result<String> {
		self.conn.send(Method::GET, &self.path("text"), None).await
	}
}
