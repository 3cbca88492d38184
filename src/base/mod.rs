//! Foundation types shared by the class-file decoder, the semantic model and the
//! query language.
//!
//! - [`TextRange`], [`TextSize`] - Character offsets inside a query line
//! - [`descriptor`] - JVM field and method descriptor parsing
//!
//! This module has NO dependencies on other codecleaver modules.

pub mod descriptor;

pub use descriptor::{DescriptorError, MethodDescriptor};
pub use text_size::{TextRange, TextSize};

// Re-export text-size types for convenience
pub use text_size;
