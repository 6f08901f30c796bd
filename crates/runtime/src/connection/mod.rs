//! HTTP connection to a WebDriver/Appium server.
//!
//! Every command is a JSON request against a path under the server endpoint.
//! Responses are unwrapped from their `{"value": ...}` envelope; a value
//! carrying a W3C `error` field, or a non-success status, becomes
//! [`Error::Remote`].


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use droid_protocol::{Envelope, WireError};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

pub use reqwest::Method;

/// Shared handle to an automation server endpoint.
///
/// Cloning is cheap: clones share the HTTP client pool and request counter.
#[derive(Clone, Debug)]
pub struct Connection {
	client: reqwest::Client,
	endpoint: Arc<str>,
	last_id: Arc<AtomicU64>,
}

impl Connection {
	/// Creates a connection to `endpoint` (e.g. `http://127.0.0.1:4723`).
	///
	/// No request is made; reachability is only discovered on first use.
	pub fn new(endpoint: &str) -> Result<Self> {
		let url = Url::parse(endpoint).map_err(|e| Error::InvalidArgument(format!("endpoint '{endpoint}': {e}")))?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(Error::InvalidArgument(format!(
				"endpoint '{endpoint}': unsupported scheme '{}'",
				url.scheme()
			)));
		}

		Ok(Self {
			client: reqwest::Client::new(),
			endpoint: Arc::from(endpoint.trim_end_matches('/')),
			last_id: Arc::new(AtomicU64::new(0)),
		})
	}

	/// Endpoint without trailing slash.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	fn url(&self, path: &str) -> String {
		format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
	}

	/// Sends a command and deserializes the unwrapped value.
	pub async fn send<T: DeserializeOwned>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T> {
		let id = self.last_id.fetch_add(1, Ordering::SeqCst);
		let url = self.url(path);

		debug!(target = "droid", id, method = %method, path, "request");

		let mut request = self.client.request(method.clone(), &url);
		match body {
			Some(body) => request = request.json(&body),
			// W3C servers reject POST without a JSON body.
			None if method == Method::POST => request = request.json(&serde_json::json!({})),
			None => {}
		}

		let response = request
			.send()
			.await
			.map_err(|e| Error::ConnectionFailed(format!("{method} {url}: {e}")))?;
		let status = response.status().as_u16();
		let bytes = response
			.bytes()
			.await
			.map_err(|e| Error::TransportError(format!("{method} {url}: {e}")))?;

		let value = decode_response(status, &bytes);
		debug!(target = "droid", id, status, ok = value.is_ok(), "response");

		Ok(serde_json::from_value(value?)?)
	}

	/// Sends a command whose value is irrelevant (usually `null`).
	pub async fn send_no_result(&self, method: Method, path: &str, body: Option<Value>) -> Result<()> {
		self.send::<Value>(method, path, body).await.map(|_| ())
	}
}

/// Unwraps a raw response body into its value, mapping server errors.
pub(crate) fn decode_response(status: u16, body: &[u8]) -> Result<Value> {
	let success = (200..300).contains(&status);

	let envelope: Envelope<Value> = match serde_json::from_slice(body) {
		Ok(envelope) => envelope,
		Err(e) if success => {
			return Err(Error::ProtocolError(format!("response is not a WebDriver envelope: {e}")));
		}
		Err(_) => {
			return Err(Error::Remote {
				name: "unknown error".into(),
				message: format!("HTTP {status}: {}", String::from_utf8_lossy(body).trim()),
				stack: None,
			});
		}
	};

	if let Some(err) = WireError::from_value(&envelope.value) {
		return Err(err.into());
	}

	if !success {
		return Err(Error::Remote {
			name: "unknown error".into(),
			message: format!("HTTP {status}: {}", envelope.value),
			stack: None,
		});
	}

	Ok(envelope.value)
}
