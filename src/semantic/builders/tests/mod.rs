#![allow(clippy::unwrap_used)]

mod tests_dependency_builder;

use std::path::Path;

use crate::classfile::{
    Annotation, AnnotationValue, ClassFile, ClassVisitor, Code, InnerClass, Instruction, Member,
};
use crate::semantic::builders::{
    DefinitionBuilder, DependencyBuilder, IgnoredDefinition, SplitNestingError,
};
use crate::semantic::graphs::DirectedGraph;
use crate::semantic::registry::{AccessFlags, Registry};
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

pub(super) fn class(name: &str, super_name: Option<&str>, interfaces: &[&str]) -> ClassFile {
    ClassFile {
        minor_version: 0,
        major_version: 50,
        access: AccessFlags::PUBLIC | AccessFlags::SUPER,
        name: name.to_string(),
        signature: None,
        super_name: super_name.map(str::to_string),
        interfaces: interfaces.iter().map(|i| i.to_string()).collect(),
        annotations: Vec::new(),
        outer_class: None,
        inner_classes: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
    }
}

pub(super) fn interface(name: &str) -> ClassFile {
    let mut class = class(name, Some("java/lang/Object"), &[]);
    class.access = AccessFlags::PUBLIC | AccessFlags::INTERFACE | AccessFlags::ABSTRACT;
    class
}

pub(super) fn member(access: u16, name: &str, descriptor: &str) -> Member {
    Member {
        access,
        name: name.to_string(),
        descriptor: descriptor.to_string(),
        signature: None,
        exceptions: Vec::new(),
        annotations: Vec::new(),
        code: None,
    }
}

pub(super) fn with_code(mut method: Member, instructions: Vec<Instruction>) -> Member {
    method.code = Some(Code {
        instructions,
        ..Code::default()
    });
    method
}

pub(super) fn annotation(descriptor: &str, elements: &[(&str, AnnotationValue)]) -> Annotation {
    Annotation {
        descriptor: descriptor.to_string(),
        elements: elements
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    }
}

pub(super) fn inner_class(name: &str, outer: Option<&str>) -> InnerClass {
    InnerClass {
        name: name.to_string(),
        outer_name: outer.map(str::to_string),
        inner_name: None,
        access: AccessFlags::PUBLIC,
    }
}

pub(super) struct Model {
    pub symbols: SymbolTable,
    pub registry: Registry,
    pub dependencies: DirectedGraph<SymbolId>,
}

impl Model {
    pub fn new() -> Self {
        let symbols = SymbolTable::new();
        let registry = Registry::new(&symbols);
        Self {
            symbols,
            registry,
            dependencies: DirectedGraph::new(),
        }
    }

    pub fn define(&mut self, file: &str, classes: &[ClassFile]) -> Vec<IgnoredDefinition> {
        let mut builder = DefinitionBuilder::new(&mut self.symbols, &mut self.registry);
        builder.visit_source(Path::new(file));
        for class in classes {
            class.accept(&mut builder);
        }
        builder.finish()
    }

    pub fn link(&mut self, file: &str, classes: &[ClassFile]) -> Result<(), SplitNestingError> {
        let mut builder = DependencyBuilder::new(
            &mut self.symbols,
            &mut self.registry,
            &mut self.dependencies,
        );
        builder.visit_source(Path::new(file));
        for class in classes {
            class.accept(&mut builder);
        }
        builder.finish()
    }

    pub fn ty(&self, name: &str) -> SymbolId {
        self.symbols.existing_type(name).unwrap()
    }

    pub fn method(&self, owner: &str, name: &str, descriptor: &str) -> SymbolId {
        self.symbols
            .existing_method(self.ty(owner), name, descriptor)
            .unwrap()
    }

    pub fn field(&self, owner: &str, name: &str, descriptor: &str) -> SymbolId {
        self.symbols
            .existing_field(self.ty(owner), name, descriptor)
            .unwrap()
    }

    pub fn out_names(&self, from: SymbolId) -> Vec<String> {
        let mut names: Vec<String> = self
            .dependencies
            .out_edges(from)
            .map(|id| self.symbols.display(id).to_string())
            .collect();
        names.sort();
        names
    }
}
