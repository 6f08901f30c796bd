//! [`Driver`] session handle.

mod input;
mod screenshot;

use std::sync::Arc;
use std::time::Duration;

use droid_protocol::{By, Capabilities, ElementRef, NewSessionResponse};
use droid_runtime::{Connection, Method, Result};
use serde_json::Value;
use tracing::{debug, info};

use crate::element::Element;
use crate::wait::DriverWait;

/// One automation session on a remote server.
///
/// Created by [`Driver::start`], released by [`Driver::quit`]. `quit`
/// consumes the handle, so a session is deleted at most once.
pub struct Driver {
	conn: Connection,
	session_id: String,
	/// `session/{id}` prefix for every command path.
	session_path: Arc<str>,
	capabilities: Value,
}

impl std::fmt::Debug for Driver {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Driver")
			.field("endpoint", &self.conn.endpoint())
			.field("session_id", &self.session_id)
			.finish()
	}
}

impl Driver {
	/// Creates a session on the server at `endpoint`.
	pub async fn start(endpoint: &str, capabilities: &Capabilities) -> Result<Self> {
		let conn = Connection::new(endpoint)?;
		let body = serde_json::to_value(capabilities.to_session_request())?;

		debug!(target = "droid", endpoint, capabilities = %body, "creating session");
		let response: NewSessionResponse = conn.send(Method::POST, "session", Some(body)).await?;
		info!(target = "droid", endpoint, session_id = %response.session_id, "session created");

		Ok(Self {
			session_path: Arc::from(format!("session/{}", response.session_id)),
			session_id: response.session_id,
			capabilities: response.capabilities,
			conn,
		})
	}

	pub fn session_id(&self) -> &str {
		&self.session_id
	}

	/// Capabilities the server actually granted.
	pub fn capabilities(&self) -> &Value {
		&self.capabilities
	}

	pub(crate) fn path(&self, suffix: &str) -> String {
		format!("{}/{suffix}", self.session_path)
	}

	pub(crate) fn connection(&self) -> &Connection {
		&self.conn
	}

	fn element(&self, reference: ElementRef) -> Element {
		Element::new(self.conn.clone(), Arc::clone(&self.session_path), reference.id)
	}

	/// Finds the first element matching `by`.
	///
	/// Fails with a "no such element" remote error when nothing matches.
	pub async fn find_element(&self, by: &By) -> Result<Element> {
		debug!(target = "droid", locator = %by, "find element");
		let reference: ElementRef = self
			.conn
			.send(Method::POST, &self.path("element"), Some(serde_json::to_value(by)?))
			.await?;
		Ok(self.element(reference))
	}

	/// Finds every element matching `by`, in document order. Empty when nothing matches.
	pub async fn find_elements(&self, by: &By) -> Result<Vec<Element>> {
		debug!(target = "droid", locator = %by, "find elements");
		let references: Vec<ElementRef> = self
			.conn
			.send(Method::POST, &self.path("elements"), Some(serde_json::to_value(by)?))
			.await?;
		Ok(references.into_iter().map(|r| self.element(r)).collect())
	}

	/// Element that currently holds input focus.
	pub async fn active_element(&self) -> Result<Element> {
		let reference: ElementRef = self.conn.send(Method::GET, &self.path("element/active"), None).await?;
		Ok(self.element(reference))
	}

	/// Polling waits against this session.
	pub fn wait(&self, timeout: Duration) -> DriverWait<'_> {
		DriverWait::new(self, timeout)
	}

	/// Deletes the session on the server.
	pub async fn quit(self) -> Result<()> {
		info!(target = "droid", session_id = %self.session_id, "deleting session");
		self.conn.send_no_result(Method::DELETE, &self.session_path, None).await
	}
}
