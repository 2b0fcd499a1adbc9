//! In-memory transport for tests.
//!
//! Every request sent through [`FakeTransport`] is parked until the paired
//! [`FakeTransportController`] answers it, so tests can hold replies, answer
//! them out of order, or fail them.
//!
//! # Example
//!
//! ```ignore
//! let (transport, mut controller) = FakeTransport::new();
//! let client = QueryClient::new(transport);
//!
//! let call = tokio::spawn(async move { client.execute_raw(&query, &CancellationToken::new()).await });
//! controller.next_request().await.respond_data(json!({"me": null}));
//! let payload = call.await??;
//! ```

use cargomax_protocol::{ErrorDescriptor, QueryRequest, ResponseEnvelope};
use futures_util::future::BoxFuture;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::Transport;
use crate::error::{Error, Result};

/// Transport half handed to the code under test.
#[derive(Clone)]
pub struct FakeTransport {
	requests: mpsc::UnboundedSender<PendingRequest>,
}

impl FakeTransport {
	/// Creates a transport and the controller that answers its requests.
	pub fn new() -> (Self, FakeTransportController) {
		let (requests, inbound) = mpsc::unbounded_channel();
		(Self { requests }, FakeTransportController { inbound })
	}
}

impl Transport for FakeTransport {
	fn send(&self, request: QueryRequest) -> BoxFuture<'_, Result<ResponseEnvelope>> {
		let requests = self.requests.clone();
		Box::pin(async move {
			let (reply, response) = oneshot::channel();
			requests
				.send(PendingRequest { request, reply })
				.map_err(|_| Error::Transport("fake transport controller dropped".to_string()))?;

			response
				.await
				.map_err(|_| Error::Transport("request dropped without a reply".to_string()))?
		})
	}
}

/// A request waiting for its reply.
pub struct PendingRequest {
	pub request: QueryRequest,
	reply: oneshot::Sender<Result<ResponseEnvelope>>,
}

impl PendingRequest {
	pub fn query(&self) -> &str {
		&self.request.query
	}

	/// Variable `name`, if the request carried it.
	pub fn variable(&self, name: &str) -> Option<&Value> {
		self.request.variables.as_ref().and_then(|vars| vars.get(name))
	}

	/// Replies with a raw envelope.
	pub fn respond(self, envelope: ResponseEnvelope) {
		let _ = self.reply.send(Ok(envelope));
	}

	/// Replies with `{ "data": data }`.
	pub fn respond_data(self, data: Value) {
		self.respond(ResponseEnvelope {
			data: Some(data),
			errors: None,
		});
	}

	/// Replies with an error list built from `messages`.
	pub fn respond_errors(self, messages: &[&str]) {
		self.respond(ResponseEnvelope {
			data: None,
			errors: Some(messages.iter().map(|m| ErrorDescriptor::new(*m)).collect()),
		});
	}

	/// Fails the exchange at the transport level.
	pub fn fail(self, error: Error) {
		let _ = self.reply.send(Err(error));
	}

	/// Resolves once the caller stopped waiting for this reply.
	pub async fn abandoned(&mut self) {
		self.reply.closed().await;
	}

	pub fn is_abandoned(&self) -> bool {
		self.reply.is_closed()
	}
}

/// Test-side handle that receives and answers requests.
pub struct FakeTransportController {
	inbound: mpsc::UnboundedReceiver<PendingRequest>,
}

impl FakeTransportController {
	/// Waits for the next request.
	///
	/// # Panics
	///
	/// Panics if every [`FakeTransport`] clone was dropped.
	pub async fn next_request(&mut self) -> PendingRequest {
		self.inbound.recv().await.expect("fake transport dropped before sending a request")
	}

	/// Returns a request that is already queued, without waiting.
	pub fn try_next_request(&mut self) -> Option<PendingRequest> {
		self.inbound.try_recv().ok()
	}

	/// Answers every request with `handler` on a background task.
	pub fn serve<F>(mut self, mut handler: F) -> JoinHandle<()>
	where
		F: FnMut(&QueryRequest) -> Result<ResponseEnvelope> + Send + 'static,
	{
		tokio::spawn(async move {
			while let Some(pending) = self.inbound.recv().await {
				match handler(&pending.request) {
					Ok(envelope) => pending.respond(envelope),
					Err(error) => pending.fail(error),
				}
			}
		})
	}
}
