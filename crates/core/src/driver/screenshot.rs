//! Screenshot methods for [`Driver`].

use std::path::Path;

use base64::Engine;
use droid_runtime::{Error, Method, Result};

use super::Driver;

impl Driver {
	/// Captures the device screen and returns PNG bytes.
	pub async fn screenshot(&self) -> Result<Vec<u8>> {
		let encoded: String = self.connection().send(Method::GET, &self.path("screenshot"), None).await?;

		// Some servers wrap the payload at 76 columns.
		let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
		base64::prelude::BASE64_STANDARD
			.decode(compact)
			.map_err(|e| Error::ProtocolError(format!("decode screenshot: {e}")))
	}

	/// Captures a screenshot, writes it to `path`, and returns the bytes.
	///
	/// Missing parent directories are created.
	pub async fn screenshot_to_file(&self, path: &Path) -> Result<Vec<u8>> {
		let bytes = self.screenshot().await?;
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}
		tokio::fs::write(path, &bytes).await?;
		Ok(bytes)
	}
}
