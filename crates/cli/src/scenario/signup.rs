//! Signup flow: open the signup screen, fill username, email and password,
//! submit, and look for the landing screen.
//!
//! Failure policy is deliberately uneven. Text entry (username, email,
//! password) is fatal because nothing after it means anything without an
//! account. Everything else is best-effort against UI flakiness: the run
//! records a warning and carries on, and a landing screen that never shows up
//! is a warning, not a failure.
//!
//! Email and password fields carry no usable locator. They are reached by
//! sending the TAB key-code from the username field, which depends on the
//! app's focus order; nothing at this layer can verify that order.

use std::time::Duration;

use droid::{By, Driver, Element, KeyCode};
use tokio::time::{Instant, sleep};
use tracing::{debug, error, info, warn};

use crate::config::SignupConfig;
use crate::credentials::Credentials;
use crate::error::{Result, ScenarioError};
use crate::locate::{LocateChain, TierMode, WaitBudget};
use crate::scenario::{SignupReport, Step, StepOutcome};
use crate::session::with_session;

pub const NO_TEXT_FIELDS: &str = "No text boxes found!";
pub const LANDING_TIMEOUT: &str = "Timed out waiting for Home Screen, but flow finished.";

/// Outcome of [`run_signup`]: the report is kept even when the run fails.
#[derive(Debug)]
pub struct SignupRun {
	pub report: SignupReport,
	pub result: Result<()>,
}

/// Runs the signup flow in its own session.
pub async fn run_signup(config: &SignupConfig, credentials: Credentials) -> SignupRun {
	let mut report = SignupReport {
		username: credentials.username.clone(),
		email: credentials.email.clone(),
		..SignupReport::default()
	};

	info!(target = "droid", endpoint = %config.endpoint, email = %credentials.email, "starting signup run");

	let result = with_session(&config.endpoint, &config.capabilities, async |driver: &Driver| {
		report.session_id = Some(driver.session_id().to_string());
		let flow = SignupFlow {
			driver,
			config,
			credentials: &credentials,
		};
		flow.run(&mut report).await
	})
	.await;

	SignupRun { report, result }
}

/// Step result before the fatal/soft policy is applied.
type StepResult = std::result::Result<StepOutcome, String>;

struct SignupFlow<'a> {
	driver: &'a Driver,
	config: &'a SignupConfig,
	credentials: &'a Credentials,
}

impl SignupFlow<'_> {
	/// Runs every step in order. A failing step ends the run when
	/// [`Step::is_fatal`] says so and is recorded as a warning otherwise.
	async fn run(&self, report: &mut SignupReport) -> Result<()> {
		for step in Step::ALL {
			info!(target = "droid", step = %step, "STEP {}: {}", step.number(), step.title());
			let started = Instant::now();

			let result = match step {
				Step::CreateAccount => self.open_signup().await,
				Step::Username => self.enter_username().await,
				Step::FocusEmail | Step::FocusPassword => self.advance_focus(step).await,
				Step::Email => self.enter_email().await,
				Step::Password => self.enter_password().await,
				Step::SignUp => self.sign_up().await,
				Step::VerifyHome => self.verify_home(report).await,
			};

			match result {
				Ok(outcome) => {
					info!(target = "droid", step = %step, outcome = ?outcome, "step finished");
					report.record(step, outcome, started.elapsed());
				}
				Err(reason) if step.is_fatal() => {
					error!(target = "droid", step = %step, "{reason}");
					report.record(
						step,
						StepOutcome::Failed {
							reason: reason.clone(),
						},
						started.elapsed(),
					);
					return Err(ScenarioError::step(step, reason));
				}
				Err(reason) => {
					warn!(target = "droid", step = %step, "{reason}");
					report.record(step, StepOutcome::Warned { reason }, started.elapsed());
				}
			}
		}
		Ok(())
	}

	fn budget(&self) -> WaitBudget {
		WaitBudget {
			timeout: self.config.wait_timeout,
			poll_interval: self.config.poll_interval,
		}
	}

	async fn pause(&self, delay: Duration) {
		if !delay.is_zero() {
			sleep(delay).await;
		}
	}

	/// A miss means the signup screen is already showing.
	async fn open_signup(&self) -> StepResult {
		let label = &self.config.create_account_label;

		let chain = LocateChain::new(label.as_str())
			.then("description", By::description_contains(label), TierMode::Await)
			.then("text", By::text_contains(label), TierMode::Immediate);

		let clicked = chain
			.resolve_and(self.driver, self.budget(), async |el: &Element| el.click().await)
			.await;
		let outcome = match clicked {
			Ok(tier) => StepOutcome::via(tier),
			Err(miss) => {
				debug!(target = "droid", %miss, "create-account lookup missed");
				StepOutcome::Skipped {
					reason: format!("Could not find '{label}' (assuming already on signup screen)"),
				}
			}
		};

		// Let the signup screen finish its transition.
		sleep(self.config.settle_delay).await;
		Ok(outcome)
	}

	/// The first text field is the username.
	async fn enter_username(&self) -> StepResult {
		let budget = self.budget();

		let fields = match self
			.driver
			.wait(budget.timeout)
			.poll_interval(budget.poll_interval)
			.presence_of_all(&By::class_name(self.config.text_field_class.as_str()))
			.await
		{
			Ok(fields) => fields,
			Err(e) if e.is_timeout() => {
				debug!(target = "droid", error = %e, "no text fields appeared");
				return Err(NO_TEXT_FIELDS.to_string());
			}
			Err(e) => return Err(e.to_string()),
		};
		let first = fields.first().ok_or_else(|| NO_TEXT_FIELDS.to_string())?;

		first.click().await.map_err(|e| e.to_string())?;
		self.pause(self.config.focus_delay).await;
		first.send_keys(&self.credentials.username).await.map_err(|e| e.to_string())?;

		Ok(StepOutcome::via(format!("first of {} text fields", fields.len())))
	}

	/// TAB to the next field.
	async fn advance_focus(&self, step: Step) -> StepResult {
		debug!(target = "droid", step = %step, "next field reached through app focus order");

		self.driver
			.press_keycode(KeyCode::TAB)
			.await
			.map_err(|e| format!("Tab key failed: {e}"))?;
		self.pause(self.config.focus_delay).await;
		Ok(StepOutcome::via(KeyCode::TAB.to_string()))
	}

	async fn type_focused(&self, text: &str) -> droid::Result<()> {
		let active = self.driver.active_element().await?;
		active.send_keys(text).await
	}

	async fn enter_email(&self) -> StepResult {
		self.type_focused(&self.credentials.email).await.map_err(|e| e.to_string())?;
		Ok(StepOutcome::via("focused element"))
	}

	/// Password into the focused field, then BACK to drop the keyboard.
	async fn enter_password(&self) -> StepResult {
		self.type_focused(&self.credentials.password).await.map_err(|e| e.to_string())?;
		self.driver
			.press_keycode(KeyCode::BACK)
			.await
			.map_err(|e| format!("Back key failed: {e}"))?;
		self.pause(self.config.focus_delay).await;
		Ok(StepOutcome::via("focused element"))
	}

	/// Falls back to the last button on screen.
	async fn sign_up(&self) -> StepResult {
		let label = &self.config.sign_up_label;

		let chain = LocateChain::new(label.as_str())
			.then("description", By::description_contains(label), TierMode::Await)
			.then("last button", By::class_name(self.config.button_class.as_str()), TierMode::LastOf);

		chain
			.resolve_and(self.driver, self.budget(), async |el: &Element| el.click().await)
			.await
			.map(StepOutcome::via)
			.map_err(|miss| miss.to_string())
	}

	/// A missing landing marker is only a warning.
	async fn verify_home(&self, report: &mut SignupReport) -> StepResult {
		let budget = self.budget();
		let marker = By::accessibility_id(self.config.landing_marker.as_str());

		let waited = self
			.driver
			.wait(budget.timeout)
			.poll_interval(budget.poll_interval)
			.presence_of(&marker)
			.await;

		match waited {
			Ok(_) => {}
			Err(e) if e.is_timeout() => {
				debug!(target = "droid", error = %e, "landing marker wait expired");
				return Err(LANDING_TIMEOUT.to_string());
			}
			Err(e) => return Err(format!("{LANDING_TIMEOUT} ({e})")),
		}

		info!(target = "droid", marker = %self.config.landing_marker, "Home Screen Reached!");
		report.landing_reached = true;

		let path = &self.config.screenshot_path;
		let bytes = self
			.driver
			.screenshot_to_file(path)
			.await
			.map_err(|e| format!("Screenshot failed: {e}"))?;
		info!(target = "droid", path = %path.display(), bytes = bytes.len(), "screenshot saved");
		report.screenshot = Some(path.clone());
		Ok(StepOutcome::via("accessibility id"))
	}
}
