//! Endpoint configuration.

use url::Url;

use crate::error::{Error, Result};

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "CARGOMAX_API_URL";
/// Base URL used when [`API_URL_ENV`] is unset or empty.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
/// Path of the query endpoint relative to the base URL.
pub const DEFAULT_ENDPOINT_PATH: &str = "/graphql";

/// Where queries are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
	base_url: Url,
	endpoint: Url,
}

impl ClientConfig {
	/// Creates a config for `base_url` with the default endpoint path.
	pub fn new(base_url: &str) -> Result<Self> {
		Self::with_endpoint_path(base_url, DEFAULT_ENDPOINT_PATH)
	}

	/// Creates a config from an explicit base URL and endpoint path.
	///
	/// The path is appended to the base URL's path, so a base of
	/// `https://api.example.com/v1` yields `https://api.example.com/v1/graphql`.
	/// A query string on the base URL is kept; a fragment is dropped.
	pub fn with_endpoint_path(base_url: &str, endpoint_path: &str) -> Result<Self> {
		let trimmed = base_url.trim().trim_end_matches('/');
		let base_url = Url::parse(trimmed).map_err(|e| Error::Config(format!("invalid base URL {trimmed:?}: {e}")))?;
		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(Error::Config(format!("unsupported URL scheme {:?}", base_url.scheme())));
		}

		let mut endpoint = base_url.clone();
		endpoint.set_fragment(None);
		endpoint
			.path_segments_mut()
			.map_err(|_| Error::Config(format!("base URL {trimmed:?} cannot carry a path")))?
			.pop_if_empty()
			.extend(endpoint_path.split('/').filter(|segment| !segment.is_empty()));

		Ok(Self { base_url, endpoint })
	}

	/// Reads [`API_URL_ENV`], falling back to [`DEFAULT_API_URL`].
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Same as [`from_env`](Self::from_env) with an injectable lookup.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let base = lookup(API_URL_ENV).filter(|value| !value.trim().is_empty());
		Self::new(base.as_deref().unwrap_or(DEFAULT_API_URL))
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Full URL queries are posted to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}
