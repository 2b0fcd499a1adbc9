use serde::{Deserialize, Serialize};

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	pub ok: bool,
	pub command: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub duration_ms: Option<u64>,
}

/// Error information for failed commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	pub code: ErrorCode,
	pub message: String,
	/// Every server-reported message when the query failed with several.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub details: Vec<String>,
}

/// Standardized error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	QueryFailed,
	TransportError,
	AuthError,
	UnexpectedPayload,
	InvalidInput,
	NotFound,
	ConfigError,
	SessionError,
	IoError,
	Cancelled,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::QueryFailed => write!(f, "QUERY_FAILED"),
			ErrorCode::TransportError => write!(f, "TRANSPORT_ERROR"),
			ErrorCode::AuthError => write!(f, "AUTH_ERROR"),
			ErrorCode::UnexpectedPayload => write!(f, "UNEXPECTED_PAYLOAD"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::NotFound => write!(f, "NOT_FOUND"),
			ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::Cancelled => write!(f, "CANCELLED"),
		}
	}
}
