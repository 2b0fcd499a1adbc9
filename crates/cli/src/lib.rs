//! `cargomax` command-line client.
//!
//! Commands share one [`context::CommandContext`]: an HTTP client whose cookie
//! jar is restored from and saved to the session file, so a login survives
//! between invocations.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod output;
pub mod session_file;
