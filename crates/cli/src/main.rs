use cargomax_cli::output::{ResultBuilder, print_result};
use cargomax_cli::{cli::Cli, commands, context::CommandContext, logging};
use clap::Parser;
use serde_json::Value;
use tracing::error;

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	let ctx = match CommandContext::new(cli.api_url.as_deref(), cli.session_file, cli.format) {
		Ok(ctx) => ctx,
		Err(err) => {
			let result = ResultBuilder::<Value>::new(cli.command.name()).error(err.to_command_error()).build();
			print_result(&result, cli.format);
			error!(target = "cargomax", error = %err, "invalid configuration");
			std::process::exit(1);
		}
	};

	if let Err(err) = commands::dispatch(cli.command, &ctx).await {
		error!(target = "cargomax", error = %err, "command failed");
		std::process::exit(1);
	}
}
