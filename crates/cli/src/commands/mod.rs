mod auth;
mod query;
mod records;

use std::time::Instant;

use cargomax_runtime::CancellationToken;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cli::Commands;
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{ResultBuilder, print_result};

/// Runs `command`, prints its result envelope and saves the session.
///
/// The envelope is printed for failures too; the error is then returned so
/// the binary can exit non-zero.
pub async fn dispatch(command: Commands, ctx: &CommandContext) -> Result<()> {
	let name = command.name();
	let started = Instant::now();
	let cancel = CancellationToken::new();

	let outcome = tokio::select! {
		outcome = execute(command, ctx, &cancel) => outcome,
		Ok(()) = tokio::signal::ctrl_c() => Err(CliError::from(cargomax_runtime::Error::Cancelled)),
	};
	debug!(target = "cargomax.cli", command = name, elapsed_ms = started.elapsed().as_millis() as u64, ok = outcome.is_ok(), "command finished");

	let outcome = match (outcome, ctx.persist()) {
		(Ok(data), Ok(())) => Ok(data),
		(Ok(_), Err(err)) => Err(err),
		(Err(err), persisted) => {
			if let Err(persist_err) = persisted {
				warn!(target = "cargomax.cli", error = %persist_err, "failed to save session");
			}
			Err(err)
		}
	};

	match outcome {
		Ok(data) => {
			let result = ResultBuilder::new(name).started_at(started).data(data).build();
			print_result(&result, ctx.format());
			Ok(())
		}
		Err(err) => {
			let result = ResultBuilder::<Value>::new(name).started_at(started).error(err.to_command_error()).build();
			print_result(&result, ctx.format());
			Err(err)
		}
	}
}

async fn execute(command: Commands, ctx: &CommandContext, cancel: &CancellationToken) -> Result<Value> {
	match command {
		Commands::Login { email, password } => auth::login(ctx, email, password, cancel).await,
		Commands::Whoami => auth::whoami(ctx).await,
		Commands::Logout => auth::logout(ctx, cancel).await,
		Commands::Query { text, vars } => query::execute(ctx, &text, vars.as_deref(), cancel).await,
		Commands::Stats => records::stats(ctx, cancel).await,
		Commands::Shipments { status, page, per_page } => records::shipments(ctx, status.as_deref(), page, per_page, cancel).await,
		Commands::Track { tracking_number } => records::track(ctx, &tracking_number, cancel).await,
		Commands::Vehicles { page, per_page } => records::vehicles(ctx, page, per_page, cancel).await,
		Commands::Drivers { page, per_page } => records::drivers(ctx, page, per_page, cancel).await,
	}
}
