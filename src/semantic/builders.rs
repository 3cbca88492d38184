/// Passes that turn scanned classes into definitions and graphs
mod definitions;
mod dependencies;
mod inheritance;
mod symbols;

pub use definitions::{DefinitionBuilder, IgnoredDefinition};
pub use dependencies::{DependencyBuilder, SplitNestingError};
pub use inheritance::build_inheritance_graph;
pub use symbols::SymbolCollector;

#[cfg(test)]
mod tests;
