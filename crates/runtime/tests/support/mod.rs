//! Minimal query endpoint for HTTP tests.
//!
//! Accepts `admin@cargomax.io` / `password123`, issues a `cargomax_token`
//! cookie on login and requires it for `shipments`.

use std::collections::HashSet;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};

pub const EMAIL: &str = "admin@cargomax.io";
pub const PASSWORD: &str = "password123";
const COOKIE: &str = "cargomax_token";

#[derive(Default)]
pub struct ServerState {
	issued: u64,
	active: HashSet<String>,
	pub content_types: Vec<String>,
	pub bodies: Vec<Value>,
}

pub struct MockServer {
	pub base_url: String,
	pub state: Arc<Mutex<ServerState>>,
}

impl MockServer {
	pub async fn start() -> anyhow::Result<Self> {
		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let state = Arc::new(Mutex::new(ServerState::default()));

		let app = Router::new()
			.route("/graphql", post(graphql))
			.route("/broken/graphql", post(broken))
			.with_state(Arc::clone(&state));
		tokio::spawn(async move {
			let _ = axum::serve(listener, app).await;
		});

		Ok(Self {
			base_url: format!("http://{addr}"),
			state,
		})
	}

	pub fn active_sessions(&self) -> usize {
		self.state.lock().active.len()
	}
}

fn user() -> Value {
	json!({
		"id": "u1",
		"email": EMAIL,
		"firstName": "Ada",
		"lastName": "Admin",
		"role": "admin",
		"avatarUrl": null
	})
}

fn session_token(headers: &HeaderMap) -> Option<String> {
	let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
	cookies
		.split(';')
		.filter_map(|pair| pair.trim().strip_prefix("cargomax_token="))
		.map(str::to_string)
		.next()
}

fn errors(message: &str) -> Value {
	json!({ "data": null, "errors": [{ "message": message }] })
}

async fn graphql(State(state): State<Arc<Mutex<ServerState>>>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
	let mut state = state.lock();
	if let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
		state.content_types.push(content_type.to_string());
	}
	state.bodies.push(body.clone());

	let query = body["query"].as_str().unwrap_or_default();
	let token = session_token(&headers).filter(|token| state.active.contains(token));

	if query.contains("login(") {
		let input = &body["variables"]["input"];
		if input["email"] != EMAIL || input["password"] != PASSWORD {
			return Json(errors("invalid email or password")).into_response();
		}
		state.issued += 1;
		let token = format!("tok-{}", state.issued);
		state.active.insert(token.clone());
		let cookie = format!("{COOKIE}={token}; Path=/; HttpOnly");
		return ([(header::SET_COOKIE, cookie)], Json(json!({ "data": { "login": { "user": user(), "token": token } } }))).into_response();
	}

	if query.contains("logout") {
		if let Some(token) = token {
			state.active.remove(&token);
		}
		return Json(json!({ "data": { "logout": true } })).into_response();
	}

	if query.contains("shipments") {
		if token.is_none() {
			return (StatusCode::UNAUTHORIZED, Json(errors("authentication required"))).into_response();
		}
		return Json(json!({
			"data": { "shipments": { "items": [
				{ "id": "s1", "trackingNumber": "CMX-1001", "status": "in_transit", "carrier": "FedEx" }
			] } }
		}))
		.into_response();
	}

	if query.contains("{ me ") {
		let me = if token.is_some() { user() } else { Value::Null };
		return Json(json!({ "data": { "me": me } })).into_response();
	}

	Json(json!({ "data": { "echo": body } })).into_response()
}

async fn broken() -> Response {
	(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response()
}
