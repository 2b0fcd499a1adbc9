//! Client runtime for the CargoMax query API.
//!
//! Two components carry the contract:
//!
//! - [`QueryClient`] sends one query to the configured endpoint and unwraps
//!   the `{data, errors}` envelope.
//! - [`SessionStore`] holds the current identity for the life of the client,
//!   running the identity check on construction and on `refetch`, and
//!   applying `login`/`logout`.
//!
//! [`LiveQuery`] and [`Dashboard`] are consumers built on the client: the
//! first owns the loading/data/error state of a single query, the second
//! wraps the queries the admin pages issue.
//!
//! Every suspending call takes a [`CancellationToken`]; cancelling it aborts
//! the call with [`Error::Cancelled`].

pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod live;
pub mod query;
pub mod session;
pub mod transport;

pub use cargomax_protocol as protocol;
pub use client::QueryClient;
pub use config::ClientConfig;
pub use dashboard::{Dashboard, PageRequest};
pub use error::{Error, Result};
pub use live::{LiveQuery, LiveState};
pub use query::Query;
pub use session::{SessionOptions, SessionState, SessionStore, SupersedePolicy};
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpTransport, Transport};
