mod caps;
mod signup;

use crate::cli::{Cli, Commands};
use crate::error::Result;
use crate::output::OutputFormat;

pub use signup::signup_result;

pub async fn dispatch(cli: Cli, format: OutputFormat) -> Result<()> {
	match cli.command {
		Commands::Signup(args) => signup::execute(args, format).await,
		Commands::Caps(args) => caps::execute(args, format),
	}
}
