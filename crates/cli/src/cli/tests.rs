use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use super::*;
use crate::config::SignupConfig;

fn signup_args(extra: &[&str]) -> SignupArgs {
	let mut argv = vec!["droid", "signup"];
	argv.extend_from_slice(extra);
	match Cli::try_parse_from(argv).unwrap().command {
		Commands::Signup(args) => args,
		other => panic!("Expected Signup command, got {other:?}"),
	}
}

#[test]
fn defaults_resolve_to_default_config() {
	let config = signup_args(&[]).into_config().unwrap();
	let expected = SignupConfig::default();

	assert_eq!(config.endpoint, expected.endpoint);
	assert_eq!(config.capabilities, expected.capabilities);
	assert_eq!(config.wait_timeout, expected.wait_timeout);
	assert_eq!(config.poll_interval, expected.poll_interval);
	assert_eq!(config.settle_delay, expected.settle_delay);
	assert_eq!(config.focus_delay, expected.focus_delay);
	assert_eq!(config.username, "TestUser123");
	assert_eq!(config.password, "password123");
	assert_eq!(config.landing_marker, "CartIcon");
	assert_eq!(config.screenshot_path, expected.screenshot_path);
}

#[test]
fn flags_override_defaults() {
	let config = signup_args(&[
		"--endpoint",
		"http://10.0.2.2:4723",
		"--device",
		"pixel-7",
		"--wait-timeout-secs",
		"5",
		"--settle-ms",
		"0",
		"--screenshot",
		"/tmp/home.png",
	])
	.into_config()
	.unwrap();

	assert_eq!(config.endpoint, "http://10.0.2.2:4723");
	assert_eq!(config.capabilities.device_name.as_deref(), Some("pixel-7"));
	assert_eq!(config.wait_timeout, Duration::from_secs(5));
	assert_eq!(config.settle_delay, Duration::ZERO);
	assert_eq!(config.screenshot_path, PathBuf::from("/tmp/home.png"));
}

#[test]
fn rejects_bad_endpoint() {
	let err = signup_args(&["--endpoint", "localhost"]).into_config().unwrap_err();
	assert!(err.to_string().contains("--endpoint"), "{err}");
}

#[test]
fn rejects_email_domain_with_at_sign() {
	let err = signup_args(&["--email-domain", "user@test.com"]).into_config().unwrap_err();
	assert!(err.to_string().contains("--email-domain"), "{err}");
}

#[test]
fn global_flags_parse_after_subcommand() {
	let cli = Cli::try_parse_from(["droid", "caps", "-f", "json", "-vv"]).unwrap();
	assert_eq!(cli.format, OutputFormat::Json);
	assert_eq!(cli.verbose, 2);
	assert!(matches!(cli.command, Commands::Caps(_)));
}

#[test]
fn huge_wait_timeout_is_accepted() {
	let config = signup_args(&["--wait-timeout-secs", "18446744073709551615"]).into_config().unwrap();
	assert_eq!(config.wait_timeout, Duration::from_secs(u64::MAX));
}

#[test]
fn flag_overrides_keep_base_capabilities() {
	let config = signup_args(&["--device", "pixel-7"]).into_config().unwrap();
	let expected = config::default_capabilities().device_name("pixel-7");
	assert_eq!(config.capabilities, expected);
	assert_eq!(config.capabilities.no_reset, Some(true));
}
