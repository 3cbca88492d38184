use crate::semantic::symbol_table::SymbolId;

use super::store::{Registry, RegistryError};

impl Registry {
    /// The first type in the superclass chain or interface closure of `ty`
    /// (including `ty` itself) that has no definition.
    pub fn first_missing_supertype(&self, ty: SymbolId) -> Option<SymbolId> {
        let Some(definition) = self.get(ty).and_then(|d| d.as_type()) else {
            return Some(ty);
        };
        definition
            .super_type
            .iter()
            .chain(definition.interfaces.iter())
            .find_map(|supertype| self.first_missing_supertype(*supertype))
    }

    /// Whether `base` appears in the superclass chain of `derived` (or is `derived`).
    pub fn is_subclass_of(&self, derived: SymbolId, base: SymbolId) -> Result<bool, RegistryError> {
        let mut current = derived;
        loop {
            if current == base {
                return Ok(true);
            }
            match self.super_type_of(current)? {
                Some(super_type) => current = super_type,
                None => return Ok(false),
            }
        }
    }

    /// Whether `ty`, one of its superclasses, or any of their super-interfaces
    /// is `interface`.
    pub fn implements_interface(
        &self,
        ty: SymbolId,
        interface: SymbolId,
    ) -> Result<bool, RegistryError> {
        let mut current = Some(ty);
        while let Some(class) = current {
            for direct in self.interfaces_of(class)? {
                if direct == interface || self.implements_interface(direct, interface)? {
                    return Ok(true);
                }
            }
            current = self.super_type_of(class)?;
        }
        Ok(false)
    }

    /// Whether a value of type `from` can be stored in a variable of type `to`.
    pub fn is_assignable_from(&self, to: SymbolId, from: SymbolId) -> Result<bool, RegistryError> {
        if to == from || self.is_subclass_of(from, to)? || self.implements_interface(from, to)? {
            return Ok(true);
        }
        Ok(to == self.object() && self.definition(from)?.is_interface())
    }

    /// The most specific class both `a` and `b` are assignable to. Interfaces
    /// that are unrelated fall back to the universal root type.
    pub fn common_superclass(&self, a: SymbolId, b: SymbolId) -> Result<SymbolId, RegistryError> {
        if self.is_assignable_from(a, b)? {
            return Ok(a);
        }
        if self.is_assignable_from(b, a)? {
            return Ok(b);
        }
        if self.definition(a)?.is_interface() || self.definition(b)?.is_interface() {
            return Ok(self.object());
        }
        let mut current = a;
        loop {
            current = match self.super_type_of(current)? {
                Some(super_type) => super_type,
                None => return Ok(self.object()),
            };
            if self.is_assignable_from(current, b)? {
                return Ok(current);
            }
        }
    }

    /// The root type ends every chain even when it was never scanned.
    fn super_type_of(&self, ty: SymbolId) -> Result<Option<SymbolId>, RegistryError> {
        if ty == self.object() && !self.contains(ty) {
            return Ok(None);
        }
        Ok(self
            .definition(ty)?
            .as_type()
            .and_then(|definition| definition.super_type))
    }

    fn interfaces_of(&self, ty: SymbolId) -> Result<Vec<SymbolId>, RegistryError> {
        if ty == self.object() && !self.contains(ty) {
            return Ok(Vec::new());
        }
        Ok(self
            .definition(ty)?
            .as_type()
            .map(|definition| definition.interfaces.clone())
            .unwrap_or_default())
    }
}
