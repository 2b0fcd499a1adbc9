//! Self-refreshing view of one query's result.
//!
//! A [`LiveQuery`] issues its query as soon as it is spawned and publishes
//! `{data, loading, error}` snapshots through a watch channel. Refetching keeps
//! the previous data visible while the new request is in flight. Dropping the
//! handle cancels every request it still has outstanding.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::debug;

use crate::client::QueryClient;
use crate::error::Error;
use crate::query::Query;

/// Message reported when a failure carries no message of its own.
pub const FALLBACK_ERROR: &str = "Failed to fetch data";

/// Snapshot of a live query.
#[derive(Debug)]
pub struct LiveState<T> {
	pub data: Option<Arc<T>>,
	pub loading: bool,
	pub error: Option<String>,
}

impl<T> LiveState<T> {
	fn loading(data: Option<Arc<T>>) -> Self {
		Self {
			data,
			loading: true,
			error: None,
		}
	}

	/// `true` once a request settled and none is in flight.
	pub fn is_settled(&self) -> bool {
		!self.loading
	}
}

impl<T> Clone for LiveState<T> {
	fn clone(&self) -> Self {
		Self {
			data: self.data.clone(),
			loading: self.loading,
			error: self.error.clone(),
		}
	}
}

/// Owner of a running query. See the module docs.
pub struct LiveQuery<T> {
	shared: Arc<Shared<T>>,
	_guard: DropGuard,
}

struct Shared<T> {
	client: QueryClient,
	query: Query,
	state: watch::Sender<LiveState<T>>,
	issued: Mutex<u64>,
	cancel: CancellationToken,
}

impl<T> LiveQuery<T>
where
	T: DeserializeOwned + Send + Sync + 'static,
{
	/// Starts `query` on `client` immediately.
	///
	/// Must be called within a Tokio runtime.
	pub fn spawn(client: QueryClient, query: Query) -> Self {
		let cancel = CancellationToken::new();
		let (state, _) = watch::channel(LiveState::loading(None));
		let shared = Arc::new(Shared {
			client,
			query,
			state,
			issued: Mutex::new(0),
			cancel: cancel.clone(),
		});
		let live = Self {
			shared,
			_guard: cancel.drop_guard(),
		};
		live.refetch();
		live
	}

	/// Re-issues the query. Previous data stays visible until the answer lands.
	pub fn refetch(&self) {
		let ticket = {
			let mut issued = self.shared.issued.lock();
			*issued += 1;
			self.shared.state.send_modify(|state| {
				state.loading = true;
				state.error = None;
			});
			*issued
		};

		let shared = Arc::clone(&self.shared);
		tokio::spawn(async move {
			let result = shared.client.execute::<T>(&shared.query, &shared.cancel).await;
			shared.settle(ticket, result);
		});
	}

	pub fn state(&self) -> LiveState<T> {
		self.shared.state.borrow().clone()
	}

	pub fn subscribe(&self) -> watch::Receiver<LiveState<T>> {
		self.shared.state.subscribe()
	}

	/// Waits until no request is in flight and returns that snapshot.
	pub async fn settled(&self) -> LiveState<T> {
		let mut rx = self.subscribe();
		let settled = async move { rx.wait_for(LiveState::is_settled).await.map(|state| state.clone()).ok() };
		settled.await.unwrap_or_else(|| self.state())
	}

	/// Cancels outstanding requests. Later calls to [`refetch`](Self::refetch) settle without data.
	pub fn cancel(&self) {
		self.shared.cancel.cancel();
	}
}

impl<T> Shared<T> {
	/// Publishes `result` if `ticket` is still the latest request.
	///
	/// The `issued` guard is held while publishing, so a concurrent
	/// [`LiveQuery::refetch`] lands either before the check or after the update.
	fn settle(&self, ticket: u64, result: crate::Result<T>) {
		let issued = self.issued.lock();
		if *issued != ticket {
			debug!(target = "cargomax.live", query = %self.query.summary(), ticket, "dropping superseded result");
			return;
		}

		self.state.send_modify(|state| {
			state.loading = false;
			match result {
				Ok(data) => {
					state.data = Some(Arc::new(data));
					state.error = None;
				}
				Err(Error::Cancelled) => {}
				Err(err) => {
					debug!(target = "cargomax.live", query = %self.query.summary(), error = %err, "live query failed");
					state.error = Some(failure_message(&err));
				}
			}
		});
		drop(issued);
	}
}

fn failure_message(err: &Error) -> String {
	let message = match err {
		Error::Query { message, .. } => message.clone(),
		other => other.to_string(),
	};
	if message.trim().is_empty() { FALLBACK_ERROR.to_string() } else { message }
}
