use clap::Parser;
use droid_cli::cli::Cli;
use droid_cli::error::ScenarioError;
use droid_cli::output::{self, OutputFormat, ResultBuilder};
use droid_cli::{commands, logging};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let format = cli.format;

	if let Err(err) = commands::dispatch(cli, format).await {
		// A failed run prints its own envelope with the partial report.
		if !err.is_output_already_printed() {
			handle_error(err, format);
		}
		std::process::exit(1);
	}
}

fn handle_error(err: ScenarioError, format: OutputFormat) {
	let cmd_error = err.to_command_error();

	output::print_error_stderr(&cmd_error);

	// Machine-readable formats still get an envelope on stdout.
	if format != OutputFormat::Text {
		let result: output::CommandResult<serde_json::Value> =
			ResultBuilder::new("unknown").command_error(cmd_error).build();
		output::print_result(&result, format);
	}
}
