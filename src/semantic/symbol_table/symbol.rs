use std::fmt;

use smol_str::SmolStr;

/// Unique identifier for a symbol in the arena.
/// Uses u32 for compact storage (supports ~4 billion symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// Create a new SymbolId from an index
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the index into the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Package,
    Type,
    Method,
    Field,
}

impl SymbolKind {
    /// Packages and types hold children; members never do.
    pub fn is_container(self) -> bool {
        matches!(self, SymbolKind::Package | SymbolKind::Type)
    }

    pub fn is_member(self) -> bool {
        !self.is_container()
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SymbolKind::Package => "Package",
            SymbolKind::Type => "Type",
            SymbolKind::Method => "Method",
            SymbolKind::Field => "Field",
        })
    }
}

/// Whether a symbol's container is known or only guessed.
///
/// A nested type (`Outer$Inner`) starts out under its package and is confirmed
/// once an inner/outer class notice moves it under its enclosing type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Confirmed,
    Provisional,
}

/// An interned package, type, method or field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub(super) kind: SymbolKind,
    /// Full internal name for packages and types, simple name for members.
    pub(super) name: SmolStr,
    pub(super) descriptor: Option<SmolStr>,
    /// Declaring type of a member.
    pub(super) owner: Option<SymbolId>,
    pub(super) parent: Option<SymbolId>,
    pub(super) children: Vec<SymbolId>,
    pub(super) placement: Placement,
}

impl Symbol {
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The last `/`-separated segment of a package or type name.
    pub fn simple_name(&self) -> &str {
        match self.kind {
            SymbolKind::Package | SymbolKind::Type => self
                .name
                .rsplit_once('/')
                .map_or(self.name.as_str(), |(_, simple)| simple),
            _ => &self.name,
        }
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.descriptor.as_deref()
    }

    pub fn owner(&self) -> Option<SymbolId> {
        self.owner
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    pub fn children(&self) -> &[SymbolId] {
        &self.children
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }
}
