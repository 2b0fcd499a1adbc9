//! Transport layer: delivers one request body and returns the parsed envelope.
//!
//! [`HttpTransport`] posts JSON over HTTP with a cookie jar so the server's
//! session cookie rides along on every later request. [`fake`] provides an
//! in-memory transport for tests that need to hold or reorder replies.

pub mod fake;
mod http;

use cargomax_protocol::{QueryRequest, ResponseEnvelope};
use futures_util::future::BoxFuture;

use crate::error::Result;

pub use http::HttpTransport;

/// One request/response exchange with the query endpoint.
///
/// Implementations attach ambient credentials themselves; callers never pass
/// tokens. Errors are [`Error::Transport`](crate::Error::Transport) for
/// anything that prevents obtaining an envelope.
pub trait Transport: Send + Sync + 'static {
	fn send(&self, request: QueryRequest) -> BoxFuture<'_, Result<ResponseEnvelope>>;
}
