//! Error types for the query runtime.

use cargomax_protocol::ErrorDescriptor;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Network failure, or a response body that is not a JSON envelope.
	#[error("transport error: {0}")]
	Transport(String),

	/// The endpoint executed the query and reported errors.
	///
	/// Displays the first message only. `errors` keeps the full list in
	/// server order.
	#[error("{message}")]
	Query { message: String, errors: Vec<ErrorDescriptor> },

	/// Login was rejected or could not be completed.
	#[error("authentication failed: {0}")]
	Auth(String),

	/// The payload did not match the shape the caller asked for.
	#[error("unexpected payload: {0}")]
	Decode(String),

	#[error("invalid query: {0}")]
	InvalidQuery(String),

	#[error("invalid configuration: {0}")]
	Config(String),

	#[error("operation cancelled")]
	Cancelled,
}

impl Error {
	/// Builds a query error from a non-empty error list.
	pub fn from_errors(errors: Vec<ErrorDescriptor>) -> Self {
		let message = errors
			.first()
			.map(|error| error.message.clone())
			.unwrap_or_else(|| "query failed".to_string());
		Error::Query { message, errors }
	}

	/// Every error descriptor the endpoint returned, empty for other variants.
	pub fn errors(&self) -> &[ErrorDescriptor] {
		match self {
			Error::Query { errors, .. } => errors,
			_ => &[],
		}
	}

	pub fn is_cancelled(&self) -> bool {
		matches!(self, Error::Cancelled)
	}
}
