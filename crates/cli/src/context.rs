//! Per-invocation state shared by commands.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cargomax_runtime::{ClientConfig, Dashboard, HttpTransport, QueryClient, SessionOptions, SessionStore};
use reqwest::cookie::Jar;
use tracing::debug;

use crate::error::Result;
use crate::output::OutputFormat;
use crate::session_file::{SessionFile, SessionRepository};

/// Client, cookie jar and session file for one run.
pub struct CommandContext {
	config: ClientConfig,
	transport: HttpTransport,
	repository: SessionRepository,
	format: OutputFormat,
	forget: AtomicBool,
}

impl CommandContext {
	/// Builds the HTTP client and restores cookies from the session file.
	///
	/// `api_url` overrides the environment; without it `CARGOMAX_API_URL` or
	/// the default base URL is used.
	pub fn new(api_url: Option<&str>, session_file: Option<PathBuf>, format: OutputFormat) -> Result<Self> {
		let config = match api_url {
			Some(url) => ClientConfig::new(url)?,
			None => ClientConfig::from_env()?,
		};
		let repository = SessionRepository::resolve(session_file);

		let jar = Arc::new(Jar::default());
		if let Some(saved) = repository.load() {
			let restored = saved.restore(&jar, config.base_url(), config.endpoint());
			debug!(target = "cargomax.cli", path = %repository.path().display(), restored, "restored session cookies");
		}
		let transport = HttpTransport::with_jar(&config, jar)?;

		Ok(Self {
			config,
			transport,
			repository,
			format,
			forget: AtomicBool::new(false),
		})
	}

	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	pub fn format(&self) -> OutputFormat {
		self.format
	}

	pub fn client(&self) -> QueryClient {
		QueryClient::new(self.transport.clone())
	}

	pub fn dashboard(&self) -> Dashboard {
		Dashboard::new(self.client())
	}

	/// A session store over this run's cookie jar. The caller shuts it down.
	pub fn session_store(&self) -> SessionStore {
		SessionStore::new(self.client())
	}

	/// Like [`session_store`](Self::session_store) without the startup
	/// identity check, for commands that log in or out straight away.
	pub fn unchecked_session_store(&self) -> SessionStore {
		SessionStore::with_options(self.client(), SessionOptions::default().without_startup_check())
	}

	/// Makes [`persist`](Self::persist) delete the session file instead of writing it.
	pub fn forget_session(&self) {
		self.forget.store(true, Ordering::Relaxed);
	}

	/// Writes the jar's cookies to the session file.
	pub fn persist(&self) -> Result<()> {
		if self.forget.load(Ordering::Relaxed) {
			self.repository.clear()?;
			return Ok(());
		}
		let file = SessionFile::capture(self.transport.cookie_jar(), self.config.base_url(), self.config.endpoint());
		if file.cookies.is_empty() && self.repository.load().is_none() {
			return Ok(());
		}
		self.repository.save(&file)
	}
}
