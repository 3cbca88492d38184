use indexmap::IndexMap;
use thiserror::Error;
use tracing::trace;

use crate::semantic::symbol_table::{ReparentError, SymbolId, SymbolKind, SymbolTable};

use super::access::AccessFlags;
use super::definition::{Definition, DefinitionKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("symbol {0:?} already has a definition")]
    Conflict(SymbolId),
    #[error("symbol {0:?} has no definition")]
    Missing(SymbolId),
    #[error(transparent)]
    Reparent(#[from] ReparentError),
}

/// Definitions keyed by identifier, in the order they were created.
///
/// The definition tree always mirrors the identifier tree: every definition
/// that has a parent is registered under the same parent in the [`SymbolTable`].
#[derive(Debug, Clone)]
pub struct Registry {
    definitions: IndexMap<SymbolId, Definition>,
    root: SymbolId,
    object: SymbolId,
}

impl Registry {
    /// Creates a registry holding only the root package definition.
    pub fn new(symbols: &SymbolTable) -> Self {
        let root = symbols.root();
        let mut definitions = IndexMap::new();
        definitions.insert(
            root,
            Definition {
                id: root,
                access: AccessFlags::new(AccessFlags::PUBLIC),
                annotations: IndexMap::new(),
                kind: DefinitionKind::Package,
                parent: None,
            },
        );
        Self {
            definitions,
            root,
            object: symbols.object(),
        }
    }

    pub fn root(&self) -> SymbolId {
        self.root
    }

    /// The universal root type.
    pub fn object(&self) -> SymbolId {
        self.object
    }

    pub fn contains(&self, id: SymbolId) -> bool {
        self.definitions.contains_key(&id)
    }

    pub fn get(&self, id: SymbolId) -> Option<&Definition> {
        self.definitions.get(&id)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Definition> {
        self.definitions.get_mut(&id)
    }

    /// Like [`get`](Self::get) but treats absence as an error.
    pub fn definition(&self, id: SymbolId) -> Result<&Definition, RegistryError> {
        self.get(id).ok_or(RegistryError::Missing(id))
    }

    /// Every definition except the root package, in creation order.
    pub fn definitions(&self) -> impl Iterator<Item = &Definition> + '_ {
        self.definitions.values().filter(|d| d.id != self.root)
    }

    /// Number of definitions, root package included.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Registers `definition` and moves its identifier under the definition's parent.
    pub fn define(
        &mut self,
        symbols: &mut SymbolTable,
        definition: Definition,
    ) -> Result<(), RegistryError> {
        let id = definition.id;
        if self.contains(id) {
            return Err(RegistryError::Conflict(id));
        }
        if let Some(parent) = definition.parent {
            symbols.set_parent(id, parent)?;
        }
        trace!("[REGISTRY] defined {}", symbols.display(id));
        self.definitions.insert(id, definition);
        Ok(())
    }

    /// Returns the definition of a package, creating it and its parent package
    /// definitions if needed.
    pub fn package_definition(
        &mut self,
        symbols: &mut SymbolTable,
        package: SymbolId,
    ) -> Result<&Definition, RegistryError> {
        if !self.contains(package) {
            let parent = symbols.parent(package).unwrap_or(self.root);
            self.package_definition(symbols, parent)?;
            self.define(
                symbols,
                Definition::new(
                    package,
                    parent,
                    AccessFlags::new(AccessFlags::PUBLIC),
                    DefinitionKind::Package,
                ),
            )?;
        }
        self.definition(package)
    }

    /// Picks the container for a newly defined type: the closest enclosing type
    /// that already has a definition, or failing that its package.
    pub fn best_guess_container_of(
        &mut self,
        symbols: &mut SymbolTable,
        type_id: SymbolId,
    ) -> Result<SymbolId, RegistryError> {
        let mut container = symbols.parent(type_id).unwrap_or(self.root);
        while symbols.kind(container) == SymbolKind::Type && !self.contains(container) {
            container = symbols.parent(container).unwrap_or(self.root);
        }
        if symbols.kind(container) == SymbolKind::Package {
            self.package_definition(symbols, container)?;
        }
        Ok(container)
    }

    /// Moves a definition, and its identifier, under `parent`.
    pub fn set_parent(
        &mut self,
        symbols: &mut SymbolTable,
        id: SymbolId,
        parent: SymbolId,
    ) -> Result<(), RegistryError> {
        let definition = self
            .definitions
            .get_mut(&id)
            .ok_or(RegistryError::Missing(id))?;
        symbols.set_parent(id, parent)?;
        definition.parent = Some(parent);
        Ok(())
    }

    // ========================================================================
    // Containment
    // ========================================================================

    /// The package that (transitively) contains `id`; a package contains itself.
    pub fn containing_package(&self, symbols: &SymbolTable, id: SymbolId) -> SymbolId {
        let mut current = id;
        while symbols.kind(current) != SymbolKind::Package {
            match self.parent_of(symbols, current) {
                Some(parent) => current = parent,
                None => return self.root,
            }
        }
        current
    }

    /// The closest type strictly containing `id`.
    pub fn containing_type(&self, symbols: &SymbolTable, id: SymbolId) -> Option<SymbolId> {
        let mut current = self.parent_of(symbols, id)?;
        while symbols.kind(current) != SymbolKind::Type {
            current = self.parent_of(symbols, current)?;
        }
        Some(current)
    }

    fn parent_of(&self, symbols: &SymbolTable, id: SymbolId) -> Option<SymbolId> {
        match self.get(id) {
            Some(definition) => definition.parent,
            None => symbols.parent(id),
        }
    }
}
