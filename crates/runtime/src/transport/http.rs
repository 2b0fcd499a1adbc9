use std::sync::Arc;

use cargomax_protocol::{QueryRequest, ResponseEnvelope};
use futures_util::future::BoxFuture;
use reqwest::cookie::Jar;
use tracing::{debug, trace};
use url::Url;

use super::Transport;
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// HTTP POST transport with a shared cookie jar.
#[derive(Clone)]
pub struct HttpTransport {
	client: reqwest::Client,
	endpoint: Url,
	jar: Arc<Jar>,
}

impl HttpTransport {
	/// Creates a transport with an empty cookie jar.
	pub fn new(config: &ClientConfig) -> Result<Self> {
		Self::with_jar(config, Arc::new(Jar::default()))
	}

	/// Creates a transport around an existing jar, e.g. one restored from disk.
	pub fn with_jar(config: &ClientConfig, jar: Arc<Jar>) -> Result<Self> {
		let client = reqwest::Client::builder()
			.cookie_provider(Arc::clone(&jar))
			.user_agent(concat!("cargomax/", env!("CARGO_PKG_VERSION")))
			.build()
			.map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

		Ok(Self {
			client,
			endpoint: config.endpoint().clone(),
			jar,
		})
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	/// Cookie jar holding the server-issued session credentials.
	pub fn cookie_jar(&self) -> &Arc<Jar> {
		&self.jar
	}

	async fn post(&self, request: QueryRequest) -> Result<ResponseEnvelope> {
		debug!(target = "cargomax.transport", endpoint = %self.endpoint, "POST query");

		let response = self
			.client
			.post(self.endpoint.clone())
			.json(&request)
			.send()
			.await
			.map_err(|e| Error::Transport(format!("request to {} failed: {e}", self.endpoint)))?;

		let status = response.status();
		let body = response
			.bytes()
			.await
			.map_err(|e| Error::Transport(format!("failed to read response body: {e}")))?;
		trace!(target = "cargomax.transport", %status, bytes = body.len(), "response received");

		// Error envelopes may arrive with non-2xx statuses, so the body is parsed regardless.
		serde_json::from_slice::<ResponseEnvelope>(&body).map_err(|e| Error::Transport(format!("invalid response body (HTTP {status}): {e}")))
	}
}

impl Transport for HttpTransport {
	fn send(&self, request: QueryRequest) -> BoxFuture<'_, Result<ResponseEnvelope>> {
		Box::pin(self.post(request))
	}
}
