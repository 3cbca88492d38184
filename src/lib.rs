//! # codecleaver-base
//!
//! Symbol dependency analysis, set queries and archive reduction for JVM class
//! files.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! command    → Line commands, diagnostics, CommandRunner
//!   ↓
//! cleave     → Archive reduction to a whitelist
//!   ↓
//! query      → Logos scanner, recursive-descent parser, evaluator
//!   ↓
//! session    → Open files, named sets, rebuild, set operations
//!   ↓
//! semantic   → Symbol table, registry, graphs, builders
//!   ↓
//! classfile  → Class-file decoding, archive enumeration, layout rewriting
//!   ↓
//! base       → Primitives (TextRange, descriptors)
//! ```

// ============================================================================
// MODULES (dependency order: base → classfile → semantic → session → query
// → cleave → command)
// ============================================================================

/// Foundation types: TextRange, descriptor parsing
pub mod base;

/// Class files: decoder, visitor replay, archive sources, member layout
pub mod classfile;

/// Semantic model: symbol table, definitions registry, directed graphs
pub mod semantic;

/// Session: open files, named sets and the operations over them
pub mod session;

/// Query language: scanner, parser, evaluation against a session
pub mod query;

/// Archive reduction to a whitelist of symbols
pub mod cleave;

/// Line commands over a session
pub mod command;

// Re-export commonly needed items
pub use base::{TextRange, TextSize};
pub use cleave::{ArchiveReducer, CleaveError};
pub use command::{CommandOutput, CommandRunner, Diagnostic, Severity};
pub use query::{QueryError, evaluate, execute};
pub use semantic::{SymbolId, SymbolKind, SymbolSet, SymbolTable};
pub use session::{Session, SessionConfig, SessionError, SetError};
