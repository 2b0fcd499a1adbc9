//! Authenticated identity and login shapes.

use serde::{Deserialize, Serialize};

/// The currently authenticated user as returned by `me` and `login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	pub id: String,
	pub email: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	/// Role tag such as `admin`, `manager` or `dispatcher`.
	#[serde(default)]
	pub role: String,
	#[serde(default)]
	pub avatar_url: Option<String>,
}

impl Identity {
	/// Full name when any name part is set, otherwise the email.
	pub fn display_name(&self) -> String {
		let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
			.into_iter()
			.flatten()
			.map(str::trim)
			.filter(|part| !part.is_empty())
			.collect();

		if parts.is_empty() { self.email.clone() } else { parts.join(" ") }
	}
}

/// Credentials for the login mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginInput {
	pub email: String,
	pub password: String,
}

impl LoginInput {
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			email: email.into(),
			password: password.into(),
		}
	}
}

/// Payload of the login mutation.
///
/// The token duplicates the session cookie set by the server; clients rely on
/// the cookie and never store the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthPayload {
	pub user: Identity,
	#[serde(default)]
	pub token: Option<String>,
}

/// `{ me { ... } }` response root. `me` is null when nobody is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
	pub me: Option<Identity>,
}

/// `login(input)` response root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
	pub login: AuthPayload,
}
