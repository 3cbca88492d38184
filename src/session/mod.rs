//! # Session
//!
//! One analysis session: the files opened so far, the identifier table, the
//! model built from the definition files and the named sets queries read and
//! write.
//!
//! ```text
//! open/close ──► files (stale) ──ensure_built──► Registry + inheritance + dependencies
//!                                                     │
//!                      named sets ◄── predefined rules ┘
//! ```
//!
//! A rebuild works on a copy of the identifier table and swaps everything in
//! only when every file was read successfully.

mod config;
mod error;
mod operations;
mod sets;
mod state;

pub use config::SessionConfig;
pub use error::{SessionError, SetError};
pub use sets::{PredefinedSet, UNEXTENSIBLE_PACKAGES};
pub use state::Session;

#[cfg(test)]
mod tests;
