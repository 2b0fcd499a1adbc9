use std::io;
use std::path::PathBuf;

use cargomax_runtime::Error as RuntimeError;
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

#[derive(Debug, Error)]
pub enum CliError {
	#[error(transparent)]
	Runtime(#[from] RuntimeError),

	#[error("{0}")]
	InvalidInput(String),

	#[error("{0}")]
	NotFound(String),

	#[error("session file {path}: {message}")]
	Session { path: PathBuf, message: String },

	#[error("io error: {0}")]
	Io(#[from] io::Error),

	#[error("json error: {0}")]
	Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
	pub fn code(&self) -> ErrorCode {
		match self {
			CliError::Runtime(err) => match err {
				RuntimeError::Transport(_) => ErrorCode::TransportError,
				RuntimeError::Query { .. } => ErrorCode::QueryFailed,
				RuntimeError::Auth(_) => ErrorCode::AuthError,
				RuntimeError::Decode(_) => ErrorCode::UnexpectedPayload,
				RuntimeError::InvalidQuery(_) => ErrorCode::InvalidInput,
				RuntimeError::Config(_) => ErrorCode::ConfigError,
				RuntimeError::Cancelled => ErrorCode::Cancelled,
			},
			CliError::InvalidInput(_) => ErrorCode::InvalidInput,
			CliError::NotFound(_) => ErrorCode::NotFound,
			CliError::Session { .. } => ErrorCode::SessionError,
			CliError::Io(_) => ErrorCode::IoError,
			CliError::Json(_) => ErrorCode::InvalidInput,
		}
	}

	/// Envelope form of this error.
	pub fn to_command_error(&self) -> CommandError {
		let details = match self {
			CliError::Runtime(err) if err.errors().len() > 1 => err.errors().iter().map(|e| e.message.clone()).collect(),
			_ => Vec::new(),
		};
		CommandError {
			code: self.code(),
			message: self.to_string(),
			details,
		}
	}
}
