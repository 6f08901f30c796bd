#[cfg(test)]
mod tests;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, ensure};
use clap::{Args, Parser, Subcommand};

use crate::config::{self, SignupConfig};
use crate::output::OutputFormat;
use crate::styles::cli_styles;

/// Root CLI for droid.
#[derive(Parser, Debug)]
#[command(name = "droid")]
#[command(about = "Scripted mobile UI flows over Appium")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format: text (default), json, or ndjson
	#[arg(short = 'f', long, global = true, value_enum, default_value = "text")]
	pub format: OutputFormat,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Run the signup flow end to end.
	Signup(SignupArgs),
	/// Print the new-session request the signup flow would send.
	Caps(SignupArgs),
}

/// Every flag defaults to the value the flow was written against.
#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
	/// Automation server endpoint.
	#[arg(long, value_name = "URL", default_value = droid::DEFAULT_ENDPOINT)]
	pub endpoint: String,

	/// Device identifier.
	#[arg(long, value_name = "SERIAL", default_value = config::DEFAULT_DEVICE)]
	pub device: String,

	/// Package of the application under test.
	#[arg(long, value_name = "PACKAGE", default_value = config::DEFAULT_APP_PACKAGE)]
	pub app_package: String,

	/// Activity launched at session start.
	#[arg(long, value_name = "ACTIVITY", default_value = config::DEFAULT_APP_ACTIVITY)]
	pub app_activity: String,

	/// Automation engine.
	#[arg(long, value_name = "NAME", default_value = config::DEFAULT_AUTOMATION)]
	pub automation_name: String,

	/// Server-side idle timeout for the session.
	#[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_NEW_COMMAND_TIMEOUT_SECS)]
	pub new_command_timeout_secs: u64,

	/// Budget for each presence wait.
	#[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_WAIT_TIMEOUT.as_secs())]
	pub wait_timeout_secs: u64,

	/// Interval between presence checks.
	#[arg(long, value_name = "MS", default_value_t = droid::Wait::DEFAULT_POLL_INTERVAL.as_millis() as u64)]
	pub poll_ms: u64,

	/// Pause before looking for text fields.
	#[arg(long, value_name = "MS", default_value_t = config::DEFAULT_SETTLE_DELAY.as_millis() as u64)]
	pub settle_ms: u64,

	/// Pause after each focus change.
	#[arg(long, value_name = "MS", default_value_t = config::DEFAULT_FOCUS_DELAY.as_millis() as u64)]
	pub focus_delay_ms: u64,

	#[arg(long, value_name = "NAME", default_value = config::DEFAULT_USERNAME)]
	pub username: String,

	#[arg(long, value_name = "PASSWORD", default_value = config::DEFAULT_PASSWORD)]
	pub password: String,

	/// Domain of the generated email address.
	#[arg(long, value_name = "DOMAIN", default_value = config::DEFAULT_EMAIL_DOMAIN)]
	pub email_domain: String,

	/// Accessibility id present only on the post-signup screen.
	#[arg(long, value_name = "ID", default_value = config::DEFAULT_LANDING_MARKER)]
	pub landing_marker: String,

	/// Where to write the landing-screen screenshot.
	#[arg(long, value_name = "FILE", default_value = config::DEFAULT_SCREENSHOT_PATH)]
	pub screenshot: PathBuf,
}

impl SignupArgs {
	/// Validates flags and resolves them into a [`SignupConfig`].
	pub fn into_config(self) -> anyhow::Result<SignupConfig> {
		ensure!(self.poll_ms > 0, "--poll-ms must be greater than zero");
		ensure!(!self.username.is_empty(), "--username must not be empty");
		ensure!(!self.password.is_empty(), "--password must not be empty");
		ensure!(
			!self.email_domain.is_empty() && !self.email_domain.contains('@'),
			"--email-domain must be a bare domain, got '{}'",
			self.email_domain
		);
		droid::Connection::new(&self.endpoint).with_context(|| format!("--endpoint '{}'", self.endpoint))?;

		let capabilities = config::default_capabilities()
			.device_name(self.device)
			.app_package(self.app_package)
			.app_activity(self.app_activity)
			.automation_name(self.automation_name)
			.new_command_timeout(self.new_command_timeout_secs);

		Ok(SignupConfig {
			endpoint: self.endpoint,
			capabilities,
			wait_timeout: Duration::from_secs(self.wait_timeout_secs),
			poll_interval: Duration::from_millis(self.poll_ms),
			settle_delay: Duration::from_millis(self.settle_ms),
			focus_delay: Duration::from_millis(self.focus_delay_ms),
			username: self.username,
			password: self.password,
			email_domain: self.email_domain,
			landing_marker: self.landing_marker,
			screenshot_path: self.screenshot,
			..SignupConfig::default()
		})
	}
}
