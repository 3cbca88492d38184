use std::fmt;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::trace;

use crate::base::descriptor::element_type_name;

use super::symbol::{Placement, Symbol, SymbolId, SymbolKind};

/// Name of the universal root type.
pub const OBJECT: &str = "java/lang/Object";

/// Structural key of an identifier. Equal keys always map to the same handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SymbolKey {
    Package(SmolStr),
    Type(SmolStr),
    Field {
        owner: SymbolId,
        name: SmolStr,
        descriptor: SmolStr,
    },
    Method {
        owner: SymbolId,
        name: SmolStr,
        descriptor: SmolStr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReparentError {
    #[error("a symbol cannot be its own parent")]
    SelfParent,
    #[error("re-parenting would make a symbol contain itself")]
    Cycle,
    #[error("only packages and types can contain symbols")]
    NotContainer,
}

/// Canonicalizing table of identifiers.
///
/// Symbols live in an arena and are never removed, so a [`SymbolId`] stays valid
/// for the lifetime of the table and of every clone made from it.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Arena storage for all symbols - single source of truth
    arena: Vec<Symbol>,
    /// Index for O(1) structural lookups: key -> SymbolId
    by_key: FxHashMap<SymbolKey, SymbolId>,
    root: SymbolId,
    object: SymbolId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_root_type(OBJECT)
    }

    /// Creates a table whose universal root type is `root_type`.
    pub fn with_root_type(root_type: &str) -> Self {
        let root = SymbolId::new(0);
        let mut table = Self {
            arena: vec![Symbol {
                kind: SymbolKind::Package,
                name: SmolStr::default(),
                descriptor: None,
                owner: None,
                parent: None,
                children: Vec::new(),
                placement: Placement::Confirmed,
            }],
            by_key: FxHashMap::default(),
            root,
            object: root,
        };
        table
            .by_key
            .insert(SymbolKey::Package(SmolStr::default()), root);
        table.object = table.intern_type(root_type);
        table
    }

    /// The root (unnamed) package.
    pub fn root(&self) -> SymbolId {
        self.root
    }

    /// The universal root type, `java/lang/Object` unless configured otherwise.
    pub fn object(&self) -> SymbolId {
        self.object
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id.index()]
    }

    pub fn kind(&self, id: SymbolId) -> SymbolKind {
        self.get(id).kind
    }

    pub fn parent(&self, id: SymbolId) -> Option<SymbolId> {
        self.get(id).parent
    }

    pub fn children(&self, id: SymbolId) -> &[SymbolId] {
        &self.get(id).children
    }

    pub fn is_provisional(&self, id: SymbolId) -> bool {
        self.get(id).placement == Placement::Provisional
    }

    /// All interned identifiers in creation order.
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.arena.len()).map(SymbolId::new)
    }

    // ========================================================================
    // Interning
    // ========================================================================

    /// Returns the package named `name` (e.g. `java/util`), creating it and its
    /// parent packages if needed.
    pub fn intern_package(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.by_key.get(&SymbolKey::Package(name.into())) {
            return id;
        }
        let parent = self.parent_package_of(name);
        self.push(
            SymbolKey::Package(name.into()),
            Symbol {
                kind: SymbolKind::Package,
                name: name.into(),
                descriptor: None,
                owner: None,
                parent: Some(parent),
                children: Vec::new(),
                placement: Placement::Confirmed,
            },
        )
    }

    /// Returns the type with internal name `name`, creating it under its package.
    ///
    /// Nested types (a `$` in the simple name) start out provisionally placed in
    /// their package until [`set_parent`](Self::set_parent) moves them.
    pub fn intern_type(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.by_key.get(&SymbolKey::Type(name.into())) {
            return id;
        }
        let parent = self.parent_package_of(name);
        let placement = if simple_name(name).contains('$') {
            Placement::Provisional
        } else {
            Placement::Confirmed
        };
        self.push(
            SymbolKey::Type(name.into()),
            Symbol {
                kind: SymbolKind::Type,
                name: name.into(),
                descriptor: None,
                owner: None,
                parent: Some(parent),
                children: Vec::new(),
                placement,
            },
        )
    }

    pub fn intern_field(&mut self, owner: SymbolId, name: &str, descriptor: &str) -> SymbolId {
        self.intern_member(SymbolKind::Field, owner, name, descriptor)
    }

    pub fn intern_method(&mut self, owner: SymbolId, name: &str, descriptor: &str) -> SymbolId {
        self.intern_member(SymbolKind::Method, owner, name, descriptor)
    }

    fn intern_member(
        &mut self,
        kind: SymbolKind,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> SymbolId {
        let key = member_key(kind, owner, name, descriptor);
        if let Some(&id) = self.by_key.get(&key) {
            return id;
        }
        self.push(
            key,
            Symbol {
                kind,
                name: name.into(),
                descriptor: Some(descriptor.into()),
                owner: Some(owner),
                parent: Some(owner),
                children: Vec::new(),
                placement: Placement::Confirmed,
            },
        )
    }

    /// Returns the type a field descriptor refers to. Arrays resolve to their
    /// element type; primitives have no identifier.
    pub fn type_of_descriptor(&mut self, descriptor: &str) -> Option<SymbolId> {
        match element_type_name(descriptor) {
            Ok(Some(name)) => Some(self.intern_type(name)),
            Ok(None) => None,
            Err(err) => {
                trace!("[SYMBOLS] ignoring {}", err);
                None
            }
        }
    }

    /// Returns the type named by an instruction operand, which is either an
    /// internal name or, for array classes, an array descriptor.
    pub fn type_of_object_name(&mut self, name: &str) -> Option<SymbolId> {
        if name.starts_with('[') {
            self.type_of_descriptor(name)
        } else {
            Some(self.intern_type(name))
        }
    }

    fn parent_package_of(&mut self, name: &str) -> SymbolId {
        match name.rfind('/') {
            Some(slash) => self.intern_package(&name[..slash]),
            None => self.root,
        }
    }

    fn push(&mut self, key: SymbolKey, symbol: Symbol) -> SymbolId {
        let id = SymbolId::new(self.arena.len());
        if let Some(parent) = symbol.parent {
            self.arena[parent.index()].children.push(id);
        }
        self.arena.push(symbol);
        self.by_key.insert(key, id);
        id
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn existing_package(&self, name: &str) -> Option<SymbolId> {
        self.by_key.get(&SymbolKey::Package(name.into())).copied()
    }

    pub fn existing_type(&self, name: &str) -> Option<SymbolId> {
        self.by_key.get(&SymbolKey::Type(name.into())).copied()
    }

    pub fn existing_field(
        &self,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        self.by_key
            .get(&member_key(SymbolKind::Field, owner, name, descriptor))
            .copied()
    }

    pub fn existing_method(
        &self,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        self.by_key
            .get(&member_key(SymbolKind::Method, owner, name, descriptor))
            .copied()
    }

    /// Finds the closest interned enclosing type by stripping `$` suffixes from
    /// the right: for `a/B$C$D` tries `a/B$C`, then `a/B`.
    pub fn outer_type(&self, id: SymbolId) -> Option<SymbolId> {
        let name = self.get(id).name.as_str();
        let simple_start = name.len() - simple_name(name).len();
        name.rmatch_indices('$')
            .filter(|(at, _)| *at > simple_start)
            .find_map(|(at, _)| self.existing_type(&name[..at]))
    }

    /// Finds the outermost interned enclosing type by scanning `$` from the left.
    pub fn outermost_type(&self, id: SymbolId) -> Option<SymbolId> {
        let name = self.get(id).name.as_str();
        let simple_start = name.len() - simple_name(name).len();
        name.match_indices('$')
            .filter(|(at, _)| *at > simple_start)
            .find_map(|(at, _)| self.existing_type(&name[..at]))
    }

    /// The identifier and all of its transitive children, in pre-order.
    pub fn descendants(&self, id: SymbolId) -> Vec<SymbolId> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.children(next).iter().rev());
        }
        result
    }

    // ========================================================================
    // Re-parenting
    // ========================================================================

    /// Moves `id` under `parent`, detaching it from its previous container.
    pub fn set_parent(&mut self, id: SymbolId, parent: SymbolId) -> Result<(), ReparentError> {
        if id == parent {
            return Err(ReparentError::SelfParent);
        }
        if !self.kind(parent).is_container() {
            return Err(ReparentError::NotContainer);
        }
        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == id {
                return Err(ReparentError::Cycle);
            }
            ancestor = self.parent(current);
        }

        let old = self.arena[id.index()].parent;
        if old != Some(parent) {
            if let Some(old) = old {
                self.arena[old.index()].children.retain(|child| *child != id);
            }
            self.arena[parent.index()].children.push(id);
            self.arena[id.index()].parent = Some(parent);
            trace!(
                "[SYMBOLS] moved {} under {}",
                self.display(id),
                self.display(parent)
            );
        }

        let symbol = &self.arena[id.index()];
        let placement = if self.kind(parent) == SymbolKind::Type
            || symbol.kind != SymbolKind::Type
            || !simple_name(&symbol.name).contains('$')
        {
            Placement::Confirmed
        } else {
            Placement::Provisional
        };
        self.arena[id.index()].placement = placement;
        Ok(())
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Renders packages and types by name and members as `type.name.descriptor`.
    pub fn display(&self, id: SymbolId) -> SymbolDisplay<'_> {
        SymbolDisplay { table: self, id }
    }
}

/// [`fmt::Display`] adapter returned by [`SymbolTable::display`].
pub struct SymbolDisplay<'a> {
    table: &'a SymbolTable,
    id: SymbolId,
}

impl fmt::Display for SymbolDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.table.get(self.id);
        match (symbol.owner, &symbol.descriptor) {
            (Some(owner), Some(descriptor)) => write!(
                f,
                "{}.{}.{}",
                self.table.get(owner).name,
                symbol.name,
                descriptor
            ),
            _ => f.write_str(&symbol.name),
        }
    }
}

fn member_key(kind: SymbolKind, owner: SymbolId, name: &str, descriptor: &str) -> SymbolKey {
    let (name, descriptor) = (SmolStr::from(name), SmolStr::from(descriptor));
    match kind {
        SymbolKind::Field => SymbolKey::Field {
            owner,
            name,
            descriptor,
        },
        _ => SymbolKey::Method {
            owner,
            name,
            descriptor,
        },
    }
}

fn simple_name(name: &str) -> &str {
    name.rsplit_once('/').map_or(name, |(_, simple)| simple)
}
