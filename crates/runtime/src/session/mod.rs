//! Session store: the single current identity shared by all consumers.
//!
//! A [`SessionStore`] is constructed once by its owner, which also calls
//! [`SessionStore::shutdown`] when the client goes away. Clones share state:
//! every transition is published through one watch channel, so all
//! subscribers observe the same value at the same time.
//!
//! # State machine
//!
//! ```text
//! Unresolved ──construct──▶ Resolving ──ok──▶ Authenticated(identity)
//!                               │
//!                               └──error──▶ Anonymous
//!
//! login:   Anonymous|Authenticated ─▶ Resolving ─▶ Authenticated   (last settled state on failure)
//! logout:  any ─▶ Anonymous                                          (immediately; remote failure ignored)
//! refetch: same transitions as the initial check
//! ```
//!
//! Each operation takes a ticket from a monotonic sequence. With
//! [`SupersedePolicy::LatestIssued`] a result is discarded once a later
//! operation has been issued. Under either policy a logout discards the
//! results of every operation issued before it.

mod state;
#[cfg(test)]
mod tests;

use std::future::Future;
use std::sync::Arc;

use cargomax_protocol::{Identity, LoginInput, LoginResponse, MeResponse};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::QueryClient;
use crate::error::{Error, Result};
use crate::query::Query;

pub use state::{SessionOptions, SessionState, SupersedePolicy};

/// Identity check run on construction and on [`SessionStore::refetch`].
pub const IDENTITY_QUERY: &str = "{ me { id email firstName lastName role avatarUrl } }";
/// Login mutation; the server answers with the identity and sets the session cookie.
pub const LOGIN_MUTATION: &str =
	"mutation Login($input: LoginInput!) { login(input: $input) { user { id email firstName lastName role avatarUrl } token } }";
/// Server-side session invalidation.
pub const LOGOUT_MUTATION: &str = "mutation { logout }";

/// Shared handle to the current session.
#[derive(Clone)]
pub struct SessionStore {
	inner: Arc<Inner>,
}

struct Inner {
	client: QueryClient,
	state: watch::Sender<SessionState>,
	sequence: Mutex<Sequence>,
	policy: SupersedePolicy,
	check_on_start: bool,
	shutdown: CancellationToken,
}

#[derive(Default)]
struct Sequence {
	issued: u64,
	applied: u64,
	/// Ticket of the latest logout. Older operations never apply.
	barrier: u64,
	/// Last state an operation settled on.
	settled: SessionState,
}

/// An operation in flight.
struct Claim {
	ticket: u64,
}

impl Inner {
	fn begin(&self, resolving: bool) -> Claim {
		let mut sequence = self.sequence.lock();
		sequence.issued += 1;
		sequence.applied = sequence.issued;
		if resolving {
			self.state.send_replace(SessionState::Resolving);
		}
		Claim { ticket: sequence.issued }
	}

	/// Claims a logout ticket and clears the session right away.
	fn begin_logout(&self) -> Claim {
		let mut sequence = self.sequence.lock();
		sequence.issued += 1;
		sequence.applied = sequence.issued;
		sequence.barrier = sequence.issued;
		let ticket = sequence.issued;
		self.publish(&mut sequence, ticket, SessionState::Anonymous);
		Claim { ticket }
	}

	fn apply(&self, ticket: u64, next: SessionState) -> bool {
		let mut sequence = self.sequence.lock();
		self.publish(&mut sequence, ticket, next)
	}

	/// Re-publishes the last settled state on behalf of an aborted operation.
	///
	/// Returns `false` without publishing when nothing has settled yet and
	/// `force` is unset.
	fn restore(&self, ticket: u64, force: bool) -> bool {
		let mut sequence = self.sequence.lock();
		if !force && !sequence.settled.is_known() {
			return false;
		}
		let settled = sequence.settled.clone();
		self.publish(&mut sequence, ticket, settled);
		true
	}

	fn publish(&self, sequence: &mut Sequence, ticket: u64, next: SessionState) -> bool {
		if ticket < sequence.barrier {
			debug!(target = "cargomax.session", ticket, barrier = sequence.barrier, "discarding result issued before logout");
			return false;
		}
		if self.policy == SupersedePolicy::LatestIssued && ticket < sequence.applied {
			debug!(target = "cargomax.session", ticket, applied = sequence.applied, "discarding superseded result");
			return false;
		}
		sequence.applied = sequence.applied.max(ticket);
		sequence.settled = next.clone();

		let label = next.label();
		let previous = self.state.send_replace(next);
		debug!(target = "cargomax.session", ticket, from = previous.label(), to = label, "session transition");
		true
	}

	fn is_current(&self, ticket: u64) -> bool {
		self.sequence.lock().applied <= ticket
	}
}

impl SessionStore {
	/// Creates the store and starts the identity check in the background.
	///
	/// Must be called within a Tokio runtime.
	pub fn new(client: QueryClient) -> Self {
		Self::with_options(client, SessionOptions::default())
	}

	pub fn with_options(client: QueryClient, options: SessionOptions) -> Self {
		let (state, _) = watch::channel(SessionState::Unresolved);
		let store = Self {
			inner: Arc::new(Inner {
				client,
				state,
				sequence: Mutex::new(Sequence::default()),
				policy: options.policy,
				check_on_start: options.check_on_start,
				shutdown: CancellationToken::new(),
			}),
		};
		if options.check_on_start {
			store.spawn_identity_check();
		}
		store
	}

	/// Snapshot of the current state.
	pub fn state(&self) -> SessionState {
		self.inner.state.borrow().clone()
	}

	pub fn identity(&self) -> Option<Identity> {
		self.inner.state.borrow().identity().cloned()
	}

	/// Receiver observing every transition.
	pub fn subscribe(&self) -> watch::Receiver<SessionState> {
		self.inner.state.subscribe()
	}

	/// Client the store issues its queries with. Sharing it shares the cookie jar.
	pub fn client(&self) -> &QueryClient {
		&self.inner.client
	}

	/// Waits until the store knows whether somebody is signed in.
	///
	/// Returns the current state early if the store is shut down.
	pub async fn resolved(&self) -> SessionState {
		let mut rx = self.subscribe();
		let known = async move { rx.wait_for(SessionState::is_known).await.map(|state| state.clone()).ok() };
		tokio::select! {
			biased;
			state = known => state.unwrap_or_else(|| self.state()),
			_ = self.inner.shutdown.cancelled() => self.state(),
		}
	}

	/// Re-runs the identity check and returns the resulting state.
	pub async fn refetch(&self, cancel: &CancellationToken) -> SessionState {
		let claim = self.inner.begin(true);
		self.run_identity_check(claim, cancel).await;
		self.state()
	}

	/// Signs in and replaces the session with the returned identity.
	///
	/// The session credential is the cookie the server sets on the response;
	/// the transport keeps it. On failure the store returns to its last
	/// settled state and the error is an [`Error::Auth`] carrying the
	/// server's message, or [`Error::Cancelled`].
	pub async fn login(&self, credentials: LoginInput, cancel: &CancellationToken) -> Result<Identity> {
		let query = Query::new(LOGIN_MUTATION)?.with_serialized_variable("input", &credentials)?;
		let claim = self.inner.begin(true);
		info!(target = "cargomax.session", email = %credentials.email, "logging in");

		match self.guarded(self.inner.client.execute::<LoginResponse>(&query, cancel)).await {
			Ok(response) => {
				let identity = response.login.user;
				self.inner.apply(claim.ticket, SessionState::Authenticated(identity.clone()));
				info!(target = "cargomax.session", user = %identity.id, role = %identity.role, "login succeeded");
				Ok(identity)
			}
			Err(Error::Cancelled) => {
				self.abort(claim);
				Err(Error::Cancelled)
			}
			Err(err) => {
				warn!(target = "cargomax.session", error = %err, "login failed");
				self.abort(claim);
				Err(Error::Auth(err.to_string()))
			}
		}
	}

	/// Clears the local session and invalidates the server one.
	///
	/// The store reads `Anonymous` as soon as the call starts, and results of
	/// operations issued before it are discarded. A failed remote call is
	/// logged and otherwise ignored.
	pub async fn logout(&self, cancel: &CancellationToken) {
		let claim = self.inner.begin_logout();

		let remote = async {
			let query = Query::new(LOGOUT_MUTATION)?;
			self.inner.client.execute_raw(&query, cancel).await
		};
		if let Err(err) = self.guarded(remote).await {
			warn!(target = "cargomax.session", error = %err, "remote logout failed; clearing local session");
		}

		self.inner.apply(claim.ticket, SessionState::Anonymous);
		info!(target = "cargomax.session", "logged out");
	}

	/// Cancels background work and every call still in flight on this store.
	pub fn shutdown(&self) {
		if !self.inner.shutdown.is_cancelled() {
			info!(target = "cargomax.session", "session store shutting down");
			self.inner.shutdown.cancel();
		}
	}

	pub fn is_shut_down(&self) -> bool {
		self.inner.shutdown.is_cancelled()
	}

	fn spawn_identity_check(&self) {
		let claim = self.inner.begin(true);
		let store = self.clone();
		tokio::spawn(async move {
			let cancel = store.inner.shutdown.child_token();
			store.run_identity_check(claim, &cancel).await;
		});
	}

	async fn run_identity_check(&self, claim: Claim, cancel: &CancellationToken) {
		match self.fetch_identity(cancel).await {
			Ok(Some(identity)) => {
				debug!(target = "cargomax.session", user = %identity.id, "identity check resolved");
				self.inner.apply(claim.ticket, SessionState::Authenticated(identity));
			}
			Ok(None) => {
				self.inner.apply(claim.ticket, SessionState::Anonymous);
			}
			Err(Error::Cancelled) => self.abort(claim),
			Err(err) => {
				debug!(target = "cargomax.session", error = %err, "identity check failed");
				self.inner.apply(claim.ticket, SessionState::Anonymous);
			}
		}
	}

	async fn fetch_identity(&self, cancel: &CancellationToken) -> Result<Option<Identity>> {
		let query = Query::new(IDENTITY_QUERY)?;
		let response: MeResponse = self.guarded(self.inner.client.execute(&query, cancel)).await?;
		Ok(response.me)
	}

	/// Puts back the last settled state after an aborted operation.
	///
	/// When nothing has settled yet, the check the store was waiting on has
	/// been superseded by this claim, so a fresh identity check starts.
	/// Stores built without a startup check fall back to `Unresolved` instead.
	fn abort(&self, claim: Claim) {
		let force = self.is_shut_down() || !self.inner.check_on_start;
		if self.inner.restore(claim.ticket, force) {
			return;
		}
		if self.inner.is_current(claim.ticket) {
			debug!(target = "cargomax.session", ticket = claim.ticket, "aborted while unresolved; rechecking identity");
			self.spawn_identity_check();
		}
	}

	async fn guarded<T>(&self, operation: impl Future<Output = Result<T>>) -> Result<T> {
		tokio::select! {
			biased;
			_ = self.inner.shutdown.cancelled() => Err(Error::Cancelled),
			result = operation => result,
		}
	}
}
