#![allow(clippy::unwrap_used)]

mod tests_hierarchy;

use smol_str::SmolStr;

use crate::semantic::registry::{AccessFlags, Definition, DefinitionKind, Registry, TypeDefinition};
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

pub(super) struct Model {
    pub symbols: SymbolTable,
    pub registry: Registry,
}

impl Model {
    pub fn new() -> Self {
        let symbols = SymbolTable::new();
        let registry = Registry::new(&symbols);
        Self { symbols, registry }
    }

    pub fn class(&mut self, name: &str, super_name: Option<&str>, interfaces: &[&str]) -> SymbolId {
        self.type_with_access(name, super_name, interfaces, AccessFlags::PUBLIC)
    }

    pub fn interface(&mut self, name: &str, interfaces: &[&str]) -> SymbolId {
        self.type_with_access(
            name,
            Some("java/lang/Object"),
            interfaces,
            AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT,
        )
    }

    pub fn type_with_access(
        &mut self,
        name: &str,
        super_name: Option<&str>,
        interfaces: &[&str],
        access: u16,
    ) -> SymbolId {
        let id = self.symbols.intern_type(name);
        let super_type = super_name.map(|s| self.symbols.intern_type(s));
        let interfaces = interfaces
            .iter()
            .map(|i| self.symbols.intern_type(i))
            .collect();
        let parent = self
            .registry
            .best_guess_container_of(&mut self.symbols, id)
            .unwrap();
        self.registry
            .define(
                &mut self.symbols,
                Definition::new(
                    id,
                    parent,
                    AccessFlags::new(access),
                    DefinitionKind::Type(TypeDefinition {
                        super_type,
                        interfaces,
                        file: SmolStr::new("test.jar"),
                    }),
                ),
            )
            .unwrap();
        id
    }

    pub fn method(&mut self, owner: SymbolId, name: &str, descriptor: &str) -> SymbolId {
        let id = self.symbols.intern_method(owner, name, descriptor);
        self.registry
            .define(
                &mut self.symbols,
                Definition::new(
                    id,
                    owner,
                    AccessFlags::new(AccessFlags::PUBLIC),
                    DefinitionKind::Method {
                        descriptor: descriptor.into(),
                    },
                ),
            )
            .unwrap();
        id
    }

    pub fn field(&mut self, owner: SymbolId, name: &str, descriptor: &str) -> SymbolId {
        let id = self.symbols.intern_field(owner, name, descriptor);
        self.registry
            .define(
                &mut self.symbols,
                Definition::new(
                    id,
                    owner,
                    AccessFlags::new(AccessFlags::PUBLIC),
                    DefinitionKind::Field {
                        descriptor: descriptor.into(),
                    },
                ),
            )
            .unwrap();
        id
    }
}
