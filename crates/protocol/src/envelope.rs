//! Request body and response envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named query parameters. Keys are unique; order carries no meaning.
pub type Variables = Map<String, Value>;

/// Request body posted to the query endpoint.
///
/// ```json
/// {
///   "query": "query($page:Int){ shipments(page:$page) { items { id } } }",
///   "variables": { "page": 1 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
	pub query: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub variables: Option<Variables>,
}

/// One entry of the response `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub path: Option<Vec<Value>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extensions: Option<Value>,
}

impl ErrorDescriptor {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			path: None,
			extensions: None,
		}
	}
}

/// Response envelope returned by the query endpoint.
///
/// Success:
/// ```json
/// { "data": { "me": { "id": "u1" } } }
/// ```
///
/// Failure (data may be present as well, it is ignored):
/// ```json
/// { "errors": [{ "message": "unauthorized" }] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub errors: Option<Vec<ErrorDescriptor>>,
}

/// Interpreted form of a [`ResponseEnvelope`]. Exactly one side is present.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
	/// Payload value; JSON null when the envelope carried no `data`.
	Data(Value),
	/// Non-empty error list in server order.
	Errors(Vec<ErrorDescriptor>),
}

impl ResponseEnvelope {
	/// Returns the error list when it is present and non-empty.
	pub fn error_list(&self) -> Option<&[ErrorDescriptor]> {
		self.errors.as_deref().filter(|errors| !errors.is_empty())
	}

	/// Collapses the envelope: a non-empty error list wins over any data.
	pub fn into_outcome(self) -> Outcome {
		match self.errors {
			Some(errors) if !errors.is_empty() => Outcome::Errors(errors),
			_ => Outcome::Data(self.data.unwrap_or(Value::Null)),
		}
	}
}
