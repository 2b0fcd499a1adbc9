//! Session state values and supersede policy.

use cargomax_protocol::Identity;

/// Current identity as seen by every consumer of a [`SessionStore`](super::SessionStore).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
	/// Seed value before the first identity check starts.
	#[default]
	Unresolved,
	/// An identity check or login is in flight.
	Resolving,
	Authenticated(Identity),
	Anonymous,
}

impl SessionState {
	pub fn identity(&self) -> Option<&Identity> {
		match self {
			SessionState::Authenticated(identity) => Some(identity),
			_ => None,
		}
	}

	/// `true` once the store knows whether somebody is signed in.
	///
	/// Loading and signed-out are different answers: `Unresolved` and
	/// `Resolving` report `false` here, `Anonymous` reports `true`.
	pub fn is_known(&self) -> bool {
		matches!(self, SessionState::Authenticated(_) | SessionState::Anonymous)
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, SessionState::Authenticated(_))
	}

	pub fn is_anonymous(&self) -> bool {
		matches!(self, SessionState::Anonymous)
	}

	pub fn label(&self) -> &'static str {
		match self {
			SessionState::Unresolved => "unresolved",
			SessionState::Resolving => "resolving",
			SessionState::Authenticated(_) => "authenticated",
			SessionState::Anonymous => "anonymous",
		}
	}
}

/// Which result wins when store operations overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SupersedePolicy {
	/// A result is dropped once a later operation has been issued. The most
	/// recently issued operation always wins.
	#[default]
	LatestIssued,
	/// Every result is applied in arrival order; the last to resolve wins.
	LastResolved,
}

/// Construction options for a [`SessionStore`](super::SessionStore).
#[derive(Debug, Clone)]
pub struct SessionOptions {
	pub policy: SupersedePolicy,
	/// Run the identity check when the store is built. On by default.
	pub check_on_start: bool,
}

impl Default for SessionOptions {
	fn default() -> Self {
		Self {
			policy: SupersedePolicy::default(),
			check_on_start: true,
		}
	}
}

impl SessionOptions {
	pub fn with_policy(mut self, policy: SupersedePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Leaves the store `Unresolved` until an operation runs.
	///
	/// For owners that log in or out straight away and would discard the
	/// startup check anyway.
	pub fn without_startup_check(mut self) -> Self {
		self.check_on_start = false;
		self
	}
}
