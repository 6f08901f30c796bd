//! Prints the new-session request without contacting a server.

use std::time::Instant;

use crate::cli::SignupArgs;
use crate::error::Result;
use crate::output::{OutputFormat, ResultBuilder, print_result};

pub fn execute(args: SignupArgs, format: OutputFormat) -> Result<()> {
	let started = Instant::now();
	let config = args.into_config()?;
	let request = serde_json::to_value(config.capabilities.to_session_request())?;

	let result = ResultBuilder::new("caps").started_at(started).data(request).build();
	print_result(&result, format);
	Ok(())
}
