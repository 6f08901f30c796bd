//! Session lifecycle helpers for scenario execution.

use droid::{Capabilities, Driver};
use tracing::warn;

use crate::error::Result;

/// Runs `body` against a fresh session and always deletes the session afterwards.
///
/// A body error wins over a teardown error; a teardown error after a
/// successful body is returned as the result.
pub async fn with_session<T, F>(endpoint: &str, capabilities: &Capabilities, body: F) -> Result<T>
where
	F: AsyncFnOnce(&Driver) -> Result<T>,
{
	let driver = Driver::start(endpoint, capabilities).await?;

	let res = body(&driver).await;
	let closed = driver.quit().await;

	match (res, closed) {
		(Ok(v), Ok(())) => Ok(v),
		(Ok(_), Err(e)) => Err(e.into()),
		(Err(e), Ok(())) => Err(e),
		(Err(e), Err(close_err)) => {
			warn!(target = "droid", error = %close_err, "session teardown failed after earlier error");
			Err(e)
		}
	}
}

#[cfg(test)]
mod tests {
	use droid::testing::FakeServer;

	use super::*;
	use crate::config::default_capabilities;
	use crate::error::ScenarioError;
	use crate::scenario::Step;

	#[tokio::test]
	async fn session_closed_after_failed_body() {
		let server = FakeServer::start(Vec::new()).await;

		let res = with_session(server.url(), &default_capabilities(), async |_: &Driver| {
			Err::<(), _>(ScenarioError::step(Step::Email, "rejected"))
		})
		.await;

		assert!(matches!(res, Err(ScenarioError::StepFailed { step: Step::Email, .. })));
		assert_eq!(server.sessions_created(), 1);
		assert_eq!(server.sessions_deleted(), 1);
	}

	#[tokio::test]
	async fn teardown_error_after_success_is_returned() {
		let server = FakeServer::start(Vec::new()).await;
		server.fail_delete();

		let res = with_session(server.url(), &default_capabilities(), async |_: &Driver| {
			Ok::<_, ScenarioError>(7)
		})
		.await;

		match res {
			Err(ScenarioError::Driver(e)) => assert_eq!(e.error_name(), Some("unknown error")),
			other => panic!("expected teardown error, got {other:?}"),
		}
		assert_eq!(server.sessions_deleted(), 0);
	}

	#[tokio::test]
	async fn body_error_wins_over_teardown_error() {
		let server = FakeServer::start(Vec::new()).await;
		server.fail_delete();

		let res = with_session(server.url(), &default_capabilities(), async |_: &Driver| {
			Err::<(), _>(ScenarioError::step(Step::Password, "Back key failed"))
		})
		.await;

		assert!(matches!(res, Err(ScenarioError::StepFailed { step: Step::Password, .. })));
	}
}
