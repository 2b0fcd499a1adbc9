//! Immutable query value.

use cargomax_protocol::{QueryRequest, Variables};
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Query text plus optional named parameters.
///
/// Built once and then only read; the `with_*` methods consume the query and
/// return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
	text: String,
	variables: Option<Variables>,
}

impl Query {
	/// Creates a query without parameters. Blank text is rejected.
	pub fn new(text: impl Into<String>) -> Result<Self> {
		let text = text.into();
		if text.trim().is_empty() {
			return Err(Error::InvalidQuery("query text is empty".to_string()));
		}
		Ok(Self { text, variables: None })
	}

	/// Adds or replaces one parameter.
	pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.variables.get_or_insert_with(Variables::new).insert(name.into(), value.into());
		self
	}

	/// Replaces the whole parameter mapping.
	pub fn with_variables(mut self, variables: Variables) -> Self {
		self.variables = Some(variables);
		self
	}

	/// Replaces the parameter mapping from any value that serializes to a JSON object.
	pub fn with_serialized_variables<T: Serialize>(self, variables: &T) -> Result<Self> {
		match serde_json::to_value(variables) {
			Ok(Value::Object(map)) => Ok(self.with_variables(map)),
			Ok(other) => Err(Error::InvalidQuery(format!("variables must be a JSON object, got {}", json_kind(&other)))),
			Err(e) => Err(Error::InvalidQuery(format!("variables are not serializable: {e}"))),
		}
	}

	/// Serializes `value` and stores it under `name`.
	pub fn with_serialized_variable<T: Serialize>(self, name: impl Into<String>, value: &T) -> Result<Self> {
		let value = serde_json::to_value(value).map_err(|e| Error::InvalidQuery(format!("variable is not serializable: {e}")))?;
		Ok(self.with_variable(name, value))
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn variables(&self) -> Option<&Variables> {
		self.variables.as_ref()
	}

	/// Short single-line label for logs.
	pub fn summary(&self) -> String {
		let collapsed = self.text.split_whitespace().collect::<Vec<_>>().join(" ");
		match collapsed.char_indices().nth(60) {
			Some((idx, _)) => format!("{}...", &collapsed[..idx]),
			None => collapsed,
		}
	}

	/// Wire form of this query.
	pub fn to_request(&self) -> QueryRequest {
		QueryRequest {
			query: self.text.clone(),
			variables: self.variables.clone(),
		}
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}
