use std::fmt::Write as _;
use std::time::Instant;

use colored::Colorize;
use serde::Serialize;

use crate::output::format::OutputFormat;
use crate::output::model::{CommandError, CommandResult, ErrorCode};

/// Builder for constructing command results.
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Option<Instant>,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Some(Instant::now()),
		}
	}

	/// Measures the duration from `start` instead of from construction.
	pub fn started_at(mut self, start: Instant) -> Self {
		self.start_time = Some(start);
		self
	}

	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	pub fn error(mut self, error: CommandError) -> Self {
		self.error = Some(error);
		self
	}

	pub fn error_code(self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error(CommandError {
			code,
			message: message.into(),
			details: Vec::new(),
		})
	}

	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();
		CommandResult {
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			duration_ms: self.start_time.map(|start| start.elapsed().as_millis() as u64),
		}
	}
}

/// Print a command result to stdout in the specified format.
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	print!("{}", render_result(result, format));
}

/// Renders a result the way [`print_result`] prints it.
pub fn render_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) -> String {
	match format {
		OutputFormat::Json => serde_json::to_string_pretty(result).map(|json| json + "\n").unwrap_or_default(),
		OutputFormat::Text => render_text(result),
	}
}

fn render_text<T: Serialize>(result: &CommandResult<T>) -> String {
	let mut out = String::new();

	if result.ok {
		if let Some(json) = result.data.as_ref().and_then(|data| serde_json::to_string_pretty(data).ok()) {
			let _ = writeln!(out, "{json}");
		}
	} else if let Some(ref error) = result.error {
		let _ = writeln!(out, "{} [{}]: {}", "Error".red().bold(), error.code, error.message);
		for detail in error.details.iter().skip(1) {
			let _ = writeln!(out, "  {} {detail}", "also:".dimmed());
		}
	}

	if let Some(duration_ms) = result.duration_ms {
		let _ = writeln!(out, "{}", format!("{} completed in {duration_ms}ms", result.command).dimmed());
	}
	out
}
