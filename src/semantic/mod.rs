//! # Semantic Model
//!
//! Turns scanned class files into a queryable model: canonical identifiers,
//! definitions with JVM resolution, and the inheritance and dependency graphs.

pub mod builders;
pub mod graphs;
pub mod registry;
pub mod symbol_table;

pub use builders::{
    DefinitionBuilder, DependencyBuilder, IgnoredDefinition, SplitNestingError, SymbolCollector,
    build_inheritance_graph,
};
pub use graphs::DirectedGraph;
pub use registry::{AccessFlags, Definition, DefinitionKind, Registry, RegistryError};
pub use symbol_table::{SymbolId, SymbolKind, SymbolTable};

/// A set of identifiers, the value every query evaluates to.
pub type SymbolSet = rustc_hash::FxHashSet<SymbolId>;
