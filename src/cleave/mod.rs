//! # Archive reduction
//!
//! Cuts a whitelist of types and members out of an archive. Resources are
//! copied unchanged, classes outside the whitelist are dropped and kept classes
//! lose their non-whitelisted fields and methods. Method bodies, the constant
//! pool and all attributes keep their original bytes.

mod error;
mod reducer;

pub use error::{CleaveError, CleaveProblem};
pub use reducer::{ArchiveReducer, CleaveSummary};

#[cfg(test)]
mod tests;
