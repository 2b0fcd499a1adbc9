//! Cookie persistence between invocations.
//!
//! The server keeps the session behind a cookie, so surviving across
//! processes means saving the jar. The file stores the cookies valid for the
//! API endpoint together with the base URL they were issued for:
//!
//! ```json
//! { "schema": 1, "apiUrl": "http://localhost:8080/", "cookies": ["cargomax_token=..."], "savedAt": 1767225600 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::cookie::{CookieStore, Jar};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{CliError, Result};

const SESSION_SCHEMA_VERSION: u32 = 1;

/// On-disk session format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFile {
	pub schema: u32,
	pub api_url: String,
	#[serde(default)]
	pub cookies: Vec<String>,
	#[serde(default)]
	pub saved_at: Option<u64>,
}

impl SessionFile {
	/// Captures the cookies `jar` would send to `endpoint`.
	pub fn capture(jar: &Jar, api_url: &Url, endpoint: &Url) -> Self {
		let cookies = jar
			.cookies(endpoint)
			.and_then(|header| header.to_str().ok().map(str::to_string))
			.map(|header| header.split("; ").filter(|pair| !pair.is_empty()).map(str::to_string).collect())
			.unwrap_or_default();

		Self {
			schema: SESSION_SCHEMA_VERSION,
			api_url: api_url.to_string(),
			cookies,
			saved_at: SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs()),
		}
	}

	/// Loads cookies into `jar` if the file belongs to `api_url`.
	///
	/// Returns the number of cookies restored.
	pub fn restore(&self, jar: &Jar, api_url: &Url, endpoint: &Url) -> usize {
		if self.api_url != api_url.as_str() {
			debug!(target = "cargomax.session_file", saved = %self.api_url, current = %api_url, "session belongs to another API; ignoring");
			return 0;
		}
		for cookie in &self.cookies {
			jar.add_cookie_str(&format!("{cookie}; Path=/"), endpoint);
		}
		self.cookies.len()
	}
}

/// Session file location with load/save helpers.
#[derive(Debug, Clone)]
pub struct SessionRepository {
	path: PathBuf,
}

impl SessionRepository {
	pub fn new(path: PathBuf) -> Self {
		Self { path }
	}

	/// Repository at `path`, or at the per-user default location.
	pub fn resolve(path: Option<PathBuf>) -> Self {
		Self::new(path.unwrap_or_else(default_session_path))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Loads the session file. A missing file is `None`; an unreadable one is
	/// logged and treated as missing.
	pub fn load(&self) -> Option<SessionFile> {
		let content = fs::read_to_string(&self.path).ok()?;
		match serde_json::from_str::<SessionFile>(&content) {
			Ok(file) if file.schema == SESSION_SCHEMA_VERSION => Some(file),
			Ok(file) => {
				warn!(target = "cargomax.session_file", path = %self.path.display(), schema = file.schema, "unsupported session schema; ignoring");
				None
			}
			Err(err) => {
				warn!(target = "cargomax.session_file", path = %self.path.display(), error = %err, "unreadable session file; ignoring");
				None
			}
		}
	}

	pub fn save(&self, file: &SessionFile) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(|e| self.error(e))?;
		}
		let json = serde_json::to_string_pretty(file)?;
		fs::write(&self.path, json).map_err(|e| self.error(e))?;
		debug!(target = "cargomax.session_file", path = %self.path.display(), cookies = file.cookies.len(), "session saved");
		Ok(())
	}

	/// Removes the file if present.
	pub fn clear(&self) -> Result<bool> {
		match fs::remove_file(&self.path) {
			Ok(()) => Ok(true),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
			Err(err) => Err(self.error(err)),
		}
	}

	fn error(&self, err: std::io::Error) -> CliError {
		CliError::Session {
			path: self.path.clone(),
			message: err.to_string(),
		}
	}
}

/// `<config dir>/cargomax/session.json`, falling back to the working directory.
pub fn default_session_path() -> PathBuf {
	dirs::config_dir()
		.unwrap_or_else(|| PathBuf::from("."))
		.join("cargomax")
		.join("session.json")
}
