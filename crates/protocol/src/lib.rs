//! Wire types for the CargoMax query API.
//!
//! This crate contains the serde-serializable types exchanged with the
//! CargoMax endpoint: the query request body, the `{data, errors}` response
//! envelope, the authenticated identity, and the dashboard records the
//! admin pages read. These types represent the shapes of data as they
//! appear on the wire.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: no behavior beyond serialization and a few accessors
//! * camelCase on the wire, snake_case in Rust
//! * Stable: changes only when the API schema changes
//!
//! Request execution and session handling live in `cargomax-runtime`.

pub mod envelope;
pub mod identity;
pub mod records;

pub use envelope::*;
pub use identity::*;
pub use records::*;
