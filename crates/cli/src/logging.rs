//! Tracing subscriber setup. Logs go to stderr so stdout carries only results.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` enables info and `-vv` debug for
/// every target starting with `cargomax`, crate module paths included.
pub fn init_logging(verbose: u8) {
	let default_level = match verbose {
		0 => "warn",
		1 => "info",
		_ => "debug",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(default_level)));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose > 1)
		.try_init();
}

fn directives(level: &str) -> String {
	format!("warn,cargomax={level}")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verbosity_scopes_to_own_targets() {
		assert_eq!(directives("debug"), "warn,cargomax=debug");
	}
}
