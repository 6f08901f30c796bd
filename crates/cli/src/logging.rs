use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Default filter for a `-v` count. Step progress is logged at info under
/// `droid`, protocol requests at debug.
fn default_directives(verbosity: u8) -> &'static str {
	match verbosity {
		0 => "warn,droid=info",
		1 => "info",
		_ => "debug",
	}
}

/// Installs the stderr subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbosity: u8) {
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_ansi(std::io::stderr().is_terminal())
		.with_target(verbosity > 0)
		.compact()
		.init();
}
