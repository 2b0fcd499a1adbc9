//! Query execution on top of a [`Transport`].
//!
//! # Message Flow
//!
//! 1. Caller builds a [`Query`] and calls one of the `execute*` methods
//! 2. The query is converted to its `{query, variables}` wire form
//! 3. The transport posts it and parses the response envelope
//! 4. A non-empty `errors` list becomes [`Error::Query`]; otherwise `data`
//!    is handed back, untyped or decoded into the caller's type
//!
//! There is no retry and no caching; each call is exactly one exchange.

use std::sync::Arc;

use cargomax_protocol::{Outcome, ResponseEnvelope};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::query::Query;
use crate::transport::{HttpTransport, Transport};

/// Cheap-to-clone handle issuing queries through a shared transport.
#[derive(Clone)]
pub struct QueryClient {
	transport: Arc<dyn Transport>,
}

impl QueryClient {
	pub fn new(transport: impl Transport) -> Self {
		Self {
			transport: Arc::new(transport),
		}
	}

	pub fn from_shared(transport: Arc<dyn Transport>) -> Self {
		Self { transport }
	}

	/// Client over HTTP with a fresh cookie jar.
	pub fn http(config: &ClientConfig) -> Result<Self> {
		Ok(Self::new(HttpTransport::new(config)?))
	}

	/// Sends `query` and returns the envelope as received.
	///
	/// Errors in the envelope are not interpreted; use this to inspect every
	/// error the endpoint reported.
	pub async fn execute_envelope(&self, query: &Query, cancel: &CancellationToken) -> Result<ResponseEnvelope> {
		if cancel.is_cancelled() {
			return Err(Error::Cancelled);
		}

		debug!(target = "cargomax.query", query = %query.summary(), "executing query");

		tokio::select! {
			biased;
			_ = cancel.cancelled() => {
				debug!(target = "cargomax.query", query = %query.summary(), "query cancelled");
				Err(Error::Cancelled)
			}
			result = self.transport.send(query.to_request()) => result,
		}
	}

	/// Sends `query` and returns `data` unchanged.
	///
	/// The payload is not validated. An absent `data` comes back as JSON null.
	pub async fn execute_raw(&self, query: &Query, cancel: &CancellationToken) -> Result<Value> {
		match self.execute_envelope(query, cancel).await?.into_outcome() {
			Outcome::Data(data) => Ok(data),
			Outcome::Errors(errors) => {
				debug!(target = "cargomax.query", count = errors.len(), first = %errors[0].message, "query returned errors");
				Err(Error::from_errors(errors))
			}
		}
	}

	/// Sends `query` and decodes `data` into `T`.
	///
	/// A payload that does not match `T` fails with [`Error::Decode`].
	pub async fn execute<T: DeserializeOwned>(&self, query: &Query, cancel: &CancellationToken) -> Result<T> {
		let data = self.execute_raw(query, cancel).await?;
		decode(data)
	}

	/// Sends `query` and decodes the root field `field` of `data` into `T`.
	pub async fn execute_field<T: DeserializeOwned>(&self, query: &Query, field: &str, cancel: &CancellationToken) -> Result<T> {
		let mut data = self.execute_raw(query, cancel).await?;
		let value = data
			.get_mut(field)
			.map(Value::take)
			.ok_or_else(|| Error::Decode(format!("missing field `{field}` in payload")))?;
		decode(value).map_err(|e| match e {
			Error::Decode(msg) => Error::Decode(format!("field `{field}`: {msg}")),
			other => other,
		})
	}
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
	serde_json::from_value(value).map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::fake::FakeTransport;
	use cargomax_protocol::{ErrorDescriptor, Identity};
	use serde::Deserialize;
	use serde_json::json;

	fn me_query() -> Query {
		Query::new("{ me { id email role } }").unwrap()
	}

	#[tokio::test]
	async fn returns_data_verbatim() {
		let (transport, mut controller) = FakeTransport::new();
		let client = QueryClient::new(transport);

		let call = tokio::spawn({
			let client = client.clone();
			async move { client.execute_raw(&me_query(), &CancellationToken::new()).await }
		});

		let payload = json!({ "me": { "id": "u1", "email": "a@b.com", "role": "admin" } });
		controller.next_request().await.respond_data(payload.clone());

		assert_eq!(call.await.unwrap().unwrap(), payload);
	}

	#[tokio::test]
	async fn first_error_message_wins() {
		let (transport, controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let server = controller.serve(|_| {
			Ok(ResponseEnvelope {
				data: Some(json!({ "me": { "id": "u1" } })),
				errors: Some(vec![ErrorDescriptor::new("unauthorized"), ErrorDescriptor::new("secondary")]),
			})
		});

		let err = client.execute_raw(&me_query(), &CancellationToken::new()).await.unwrap_err();
		assert_eq!(err.to_string(), "unauthorized");
		assert_eq!(err.errors().len(), 2);
		server.abort();
	}

	#[tokio::test]
	async fn envelope_exposes_every_error() {
		let (transport, controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let server = controller.serve(|_| {
			Ok(ResponseEnvelope {
				data: None,
				errors: Some(vec![ErrorDescriptor::new("a"), ErrorDescriptor::new("b"), ErrorDescriptor::new("c")]),
			})
		});

		let envelope = client.execute_envelope(&me_query(), &CancellationToken::new()).await.unwrap();
		let messages: Vec<_> = envelope.error_list().unwrap().iter().map(|e| e.message.as_str()).collect();
		assert_eq!(messages, ["a", "b", "c"]);
		server.abort();
	}

	#[tokio::test]
	async fn request_body_carries_query_and_variables() {
		let (transport, mut controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let query = Query::new("query($status:String){ shipments(status:$status) { items { id } } }")
			.unwrap()
			.with_variable("status", "delayed");

		let call = tokio::spawn(async move { client.execute_raw(&query, &CancellationToken::new()).await });

		let pending = controller.next_request().await;
		assert!(pending.query().contains("shipments"));
		assert_eq!(pending.variable("status"), Some(&json!("delayed")));
		pending.respond_data(json!({ "shipments": { "items": [] } }));
		call.await.unwrap().unwrap();
	}

	#[tokio::test]
	async fn typed_execution_validates_shape() {
		#[derive(Debug, Deserialize)]
		struct Me {
			#[allow(dead_code)]
			me: Identity,
		}

		let (transport, controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let server = controller.serve(|_| {
			Ok(ResponseEnvelope {
				data: Some(json!({ "me": { "id": 42 } })),
				errors: None,
			})
		});

		let err = client.execute::<Me>(&me_query(), &CancellationToken::new()).await.unwrap_err();
		assert!(matches!(err, Error::Decode(_)), "unexpected error: {err:?}");
		server.abort();
	}

	#[tokio::test]
	async fn execute_field_unwraps_root() {
		let (transport, controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let server = controller.serve(|_| {
			Ok(ResponseEnvelope {
				data: Some(json!({ "me": { "id": "u1", "email": "a@b.com", "role": "admin" } })),
				errors: None,
			})
		});

		let cancel = CancellationToken::new();
		let identity: Identity = client.execute_field(&me_query(), "me", &cancel).await.unwrap();
		assert_eq!(identity.email, "a@b.com");

		let missing = client.execute_field::<Identity>(&me_query(), "viewer", &cancel).await.unwrap_err();
		assert!(missing.to_string().contains("viewer"));
		server.abort();
	}

	#[tokio::test]
	async fn cancellation_aborts_pending_call() {
		let (transport, mut controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let cancel = CancellationToken::new();

		let call = tokio::spawn({
			let cancel = cancel.clone();
			async move { client.execute_raw(&me_query(), &cancel).await }
		});

		let mut pending = controller.next_request().await;
		cancel.cancel();
		pending.abandoned().await;

		assert!(call.await.unwrap().unwrap_err().is_cancelled());
	}

	#[tokio::test]
	async fn already_cancelled_token_sends_nothing() {
		let (transport, mut controller) = FakeTransport::new();
		let client = QueryClient::new(transport);
		let cancel = CancellationToken::new();
		cancel.cancel();

		let result = client.execute_raw(&me_query(), &cancel).await;
		assert!(result.unwrap_err().is_cancelled());
		assert!(controller.try_next_request().is_none());
	}

	#[tokio::test]
	async fn transport_failure_propagates() {
		let (transport, mut controller) = FakeTransport::new();
		let client = QueryClient::new(transport);

		let call = tokio::spawn(async move { client.execute_raw(&me_query(), &CancellationToken::new()).await });
		controller.next_request().await.fail(Error::Transport("connection reset".into()));

		assert!(matches!(call.await.unwrap(), Err(Error::Transport(msg)) if msg == "connection reset"));
	}
}
