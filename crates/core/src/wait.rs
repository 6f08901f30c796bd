//! Presence waits bound to a [`Driver`].

use std::time::Duration;

use droid_protocol::By;
use droid_runtime::{Result, Wait};

use crate::driver::Driver;
use crate::element::Element;

/// Polling waits for element presence, created by [`Driver::wait`].
pub struct DriverWait<'a> {
	driver: &'a Driver,
	wait: Wait,
}

impl<'a> DriverWait<'a> {
	pub(crate) fn new(driver: &'a Driver, timeout: Duration) -> Self {
		Self {
			driver,
			wait: Wait::new(timeout),
		}
	}

	pub fn poll_interval(mut self, interval: Duration) -> Self {
		self.wait = self.wait.poll_interval(interval);
		self
	}

	/// Waits until at least one element matches `by` and returns the first.
	pub async fn presence_of(&self, by: &By) -> Result<Element> {
		let condition = format!("element {by} present");
		self.wait
			.until(&condition, || async move { self.driver.find_element(by).await.map(Some) })
			.await
	}

	/// Waits until at least one element matches `by` and returns all matches.
	pub async fn presence_of_all(&self, by: &By) -> Result<Vec<Element>> {
		let condition = format!("elements {by} present");
		self.wait
			.until(&condition, || async move {
				let found = self.driver.find_elements(by).await?;
				Ok((!found.is_empty()).then_some(found))
			})
			.await
	}
}
