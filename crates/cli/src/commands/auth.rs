use cargomax_runtime::protocol::{Identity, LoginInput};
use cargomax_runtime::{CancellationToken, SessionState};
use serde_json::{Value, json};
use tracing::info;

use crate::context::CommandContext;
use crate::error::{CliError, Result};

pub async fn login(ctx: &CommandContext, email: String, password: String, cancel: &CancellationToken) -> Result<Value> {
	if email.trim().is_empty() || password.is_empty() {
		return Err(CliError::InvalidInput("email and password are required".to_string()));
	}

	let store = ctx.unchecked_session_store();
	let result = store.login(LoginInput::new(email, password), cancel).await;
	store.shutdown();

	let identity = result?;
	info!(target = "cargomax.cli", user = %identity.id, api = %ctx.config().base_url(), "signed in");
	Ok(identity_payload(&identity))
}

/// Reports the signed-in user. Being signed out is a successful answer.
pub async fn whoami(ctx: &CommandContext) -> Result<Value> {
	let store = ctx.session_store();
	let state = store.resolved().await;
	store.shutdown();

	match state {
		SessionState::Authenticated(identity) => Ok(identity_payload(&identity)),
		_ => Ok(json!({ "authenticated": false })),
	}
}

pub async fn logout(ctx: &CommandContext, cancel: &CancellationToken) -> Result<Value> {
	let store = ctx.unchecked_session_store();
	store.logout(cancel).await;
	store.shutdown();

	ctx.forget_session();
	Ok(json!({ "authenticated": false }))
}

fn identity_payload(identity: &Identity) -> Value {
	json!({
		"authenticated": true,
		"displayName": identity.display_name(),
		"user": identity,
	})
}
