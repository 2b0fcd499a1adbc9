use cargomax_runtime::{CancellationToken, Query};
use serde_json::Value;

use crate::context::CommandContext;
use crate::error::{CliError, Result};

pub async fn execute(ctx: &CommandContext, text: &str, vars: Option<&str>, cancel: &CancellationToken) -> Result<Value> {
	let query = build_query(text, vars)?;
	Ok(ctx.client().execute_raw(&query, cancel).await?)
}

fn build_query(text: &str, vars: Option<&str>) -> Result<Query> {
	let query = Query::new(text)?;
	let Some(raw) = vars else {
		return Ok(query);
	};

	let value: Value = serde_json::from_str(raw).map_err(|e| CliError::InvalidInput(format!("--vars is not valid JSON: {e}")))?;
	Ok(query.with_serialized_variables(&value)?)
}
