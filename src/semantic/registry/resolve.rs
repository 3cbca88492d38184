//! JVM field and method resolution (JVMS §5.4.3.2 and §5.4.3.3).

use tracing::trace;

use crate::semantic::symbol_table::{SymbolId, SymbolTable};

use super::store::Registry;

impl Registry {
    /// A method declared directly by `owner` with a definition.
    pub fn lookup_method(
        &self,
        symbols: &SymbolTable,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        symbols
            .existing_method(owner, name, descriptor)
            .filter(|id| self.contains(*id))
    }

    /// A field declared directly by `owner` with a definition.
    pub fn lookup_field(
        &self,
        symbols: &SymbolTable,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        symbols
            .existing_field(owner, name, descriptor)
            .filter(|id| self.contains(*id))
    }

    /// Resolves a field reference: the type itself, then its super-interfaces
    /// (recursively), then its superclass. `None` when `owner` is not defined or
    /// the search runs off the defined part of the hierarchy.
    pub fn resolve_field(
        &self,
        symbols: &SymbolTable,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        let ty = self.get(owner)?.as_type()?;
        if let Some(field) = self.lookup_field(symbols, owner, name, descriptor) {
            return Some(field);
        }
        for interface in &ty.interfaces {
            if let Some(field) = self.resolve_field(symbols, *interface, name, descriptor) {
                return Some(field);
            }
        }
        ty.super_type
            .and_then(|super_type| self.resolve_field(symbols, super_type, name, descriptor))
    }

    /// Resolves a method reference: the type itself, then its superclass chain,
    /// then its super-interfaces.
    pub fn resolve_method(
        &self,
        symbols: &SymbolTable,
        owner: SymbolId,
        name: &str,
        descriptor: &str,
    ) -> Option<SymbolId> {
        let ty = self.get(owner)?.as_type()?;
        if let Some(method) = self.lookup_method(symbols, owner, name, descriptor) {
            return Some(method);
        }
        if let Some(method) = ty
            .super_type
            .and_then(|super_type| self.resolve_method(symbols, super_type, name, descriptor))
        {
            return Some(method);
        }
        ty.interfaces
            .iter()
            .find_map(|interface| self.resolve_method(symbols, *interface, name, descriptor))
    }

    /// Resolves a field reference found in code, interning a fresh field on the
    /// named owner when resolution fails.
    pub fn resolve_or_add_field_reference(
        &self,
        symbols: &mut SymbolTable,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> SymbolId {
        let owner = symbols.intern_type(owner);
        match self.resolve_field(symbols, owner, name, descriptor) {
            Some(field) => field,
            None => {
                trace!(
                    "[REGISTRY] unresolved field {}.{}.{}",
                    symbols.display(owner),
                    name,
                    descriptor
                );
                symbols.intern_field(owner, name, descriptor)
            }
        }
    }

    /// Method counterpart of
    /// [`resolve_or_add_field_reference`](Self::resolve_or_add_field_reference).
    pub fn resolve_or_add_method_reference(
        &self,
        symbols: &mut SymbolTable,
        owner: &str,
        name: &str,
        descriptor: &str,
    ) -> SymbolId {
        let owner = symbols.intern_type(owner);
        match self.resolve_method(symbols, owner, name, descriptor) {
            Some(method) => method,
            None => {
                trace!(
                    "[REGISTRY] unresolved method {}.{}.{}",
                    symbols.display(owner),
                    name,
                    descriptor
                );
                symbols.intern_method(owner, name, descriptor)
            }
        }
    }
}
