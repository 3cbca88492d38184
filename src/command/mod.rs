//! # Commands
//!
//! The line-oriented surface over a [`Session`](crate::session::Session).
//!
//! ```text
//! line ──CommandLine──► CommandKind + arguments ──CommandRunner──► CommandOutput
//!                     └─► Statement (no command word) ──query::execute_statement
//! ```
//!
//! Every command except the file commands rebuilds a stale session first.
//! Problems never abort the runner; they come back as [`Diagnostic`]s.

mod diagnostics;
mod kind;
mod line;
mod runner;

pub use diagnostics::{Diagnostic, Severity};
pub use kind::CommandKind;
pub use runner::{CommandOutput, CommandRunner};

#[cfg(test)]
mod tests;
