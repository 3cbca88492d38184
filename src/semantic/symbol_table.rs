//! Canonical identifiers for the packages, types, methods and fields of a binary set
mod symbol;
mod table;

pub use symbol::{Placement, Symbol, SymbolId, SymbolKind};
pub use table::{OBJECT, ReparentError, SymbolDisplay, SymbolTable};
