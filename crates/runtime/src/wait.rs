//! Bounded polling for server-side conditions.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::error::{Error, Result};

/// Polls a probe until it yields a value or the timeout elapses.
///
/// A probe returning `Ok(None)` or a "no such element" error means the
/// condition does not hold yet. Any other error ends the wait immediately.
#[derive(Debug, Clone, Copy)]
pub struct Wait {
	timeout: Duration,
	poll_interval: Duration,
}

impl Wait {
	pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

	pub fn new(timeout: Duration) -> Self {
		Self {
			timeout,
			poll_interval: Self::DEFAULT_POLL_INTERVAL,
		}
	}

	pub fn poll_interval(mut self, interval: Duration) -> Self {
		self.poll_interval = interval;
		self
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Runs `probe` until it returns `Ok(Some(_))`.
	///
	/// The probe always runs at least once, even with a zero timeout. A
	/// timeout too large to place on the clock means polling without a deadline.
	pub async fn until<T, F, Fut>(&self, condition: &str, mut probe: F) -> Result<T>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<Option<T>>>,
	{
		let deadline = Instant::now().checked_add(self.timeout);
		let mut attempts = 0u32;
		let mut last_miss: Option<String> = None;

		loop {
			attempts += 1;
			match probe().await {
				Ok(Some(value)) => return Ok(value),
				Ok(None) => {}
				Err(e) if e.is_no_such_element() => last_miss = Some(e.to_string()),
				Err(e) => return Err(e),
			}

			let pause = match deadline {
				Some(deadline) => {
					let now = Instant::now();
					if now >= deadline {
						break;
					}
					self.poll_interval.min(deadline - now)
				}
				None => self.poll_interval,
			};
			trace!(target = "droid", condition, attempts, "condition not met, polling");
			tokio::time::sleep(pause).await;
		}

		let mut message = format!("{condition} after {}ms ({attempts} attempts)", self.timeout.as_millis());
		if let Some(miss) = last_miss {
			message.push_str(&format!("; last: {miss}"));
		}
		Err(Error::Timeout(message))
	}
}
