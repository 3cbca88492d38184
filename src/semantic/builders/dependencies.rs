use std::path::Path;

use smol_str::SmolStr;
use thiserror::Error;
use tracing::{trace, warn};

use crate::base::descriptor::method_parts;
use crate::classfile::{
    ClassHeader, ClassVisitor, CodeVisit, DecodeOptions, InnerClass, Instruction, LocalVariable,
    MemberHeader, OuterClass,
};
use crate::semantic::graphs::DirectedGraph;
use crate::semantic::registry::Registry;
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

/// An inner type and its outer type were defined by different files.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Inner Type '{inner}' contained in file '{inner_file}' is in a different file than outer type '{outer}' in file '{outer_file}'."
)]
pub struct SplitNestingError {
    pub inner: String,
    pub inner_file: String,
    pub outer: String,
    pub outer_file: String,
}

/// Second pass: records every use of one symbol by another.
///
/// Also confirms the placement of nested types from `InnerClasses` and
/// `EnclosingMethod` attributes.
pub struct DependencyBuilder<'a> {
    symbols: &'a mut SymbolTable,
    registry: &'a mut Registry,
    graph: &'a mut DirectedGraph<SymbolId>,
    file: SmolStr,
    debug_info: bool,
    class: Option<SymbolId>,
    member: Option<SymbolId>,
    error: Option<SplitNestingError>,
}

impl<'a> DependencyBuilder<'a> {
    pub fn new(
        symbols: &'a mut SymbolTable,
        registry: &'a mut Registry,
        graph: &'a mut DirectedGraph<SymbolId>,
    ) -> Self {
        Self {
            symbols,
            registry,
            graph,
            file: SmolStr::default(),
            debug_info: true,
            class: None,
            member: None,
            error: None,
        }
    }

    /// Whether local-variable descriptors contribute dependencies.
    pub fn with_debug_info(mut self, debug_info: bool) -> Self {
        self.debug_info = debug_info;
        self
    }

    pub fn finish(self) -> Result<(), SplitNestingError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn is_defined_here(&self, id: SymbolId) -> bool {
        let Some(file) = self.registry.get(id).and_then(|d| d.file()) else {
            return false;
        };
        if file != self.file {
            return false;
        }
        let mut outer = self.symbols.outer_type(id);
        while let Some(ty) = outer {
            if let Some(other) = self.registry.get(ty).and_then(|d| d.file()) {
                if other != self.file {
                    return false;
                }
            }
            outer = self.symbols.outer_type(ty);
        }
        true
    }

    fn add_edge_from_member(&mut self, target: Option<SymbolId>) {
        self.graph.add_optional_edge(self.member, target);
    }

    fn add_outer_class(&mut self, inner: &str, outer: &str) {
        let (Some(inner), Some(outer)) = (
            self.symbols.existing_type(inner),
            self.symbols.existing_type(outer),
        ) else {
            return;
        };
        if self.class != Some(inner) && self.class != Some(outer) {
            return;
        }
        let (Some(inner_file), Some(outer_file)) = (
            self.registry.get(inner).and_then(|d| d.file()),
            self.registry.get(outer).and_then(|d| d.file()),
        ) else {
            return;
        };
        if inner_file != outer_file {
            self.error = Some(SplitNestingError {
                inner: self.symbols.display(inner).to_string(),
                inner_file: inner_file.to_string(),
                outer: self.symbols.display(outer).to_string(),
                outer_file: outer_file.to_string(),
            });
            self.class = None;
            return;
        }

        self.graph.add_edge(inner, outer);
        if let Err(err) = self.registry.set_parent(self.symbols, inner, outer) {
            warn!(
                "[DEPENDENCIES] cannot nest {} in {}: {}",
                self.symbols.display(inner),
                self.symbols.display(outer),
                err
            );
        }
    }
}

impl ClassVisitor for DependencyBuilder<'_> {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            code: true,
            debug_info: self.debug_info,
        }
    }

    fn visit_source(&mut self, path: &Path) {
        self.file = SmolStr::new(path.to_string_lossy());
    }

    fn visit_class(&mut self, class: &ClassHeader<'_>) {
        self.class = None;
        if self.error.is_some() {
            return;
        }
        let id = self.symbols.intern_type(class.name);
        if !self.is_defined_here(id) {
            trace!("[DEPENDENCIES] skipping {} in {}", class.name, self.file);
            return;
        }
        self.class = Some(id);

        if let Some(super_name) = class.super_name {
            let super_type = self.symbols.intern_type(super_name);
            self.graph.add_edge(id, super_type);
        }
        for interface in class.interfaces {
            let interface = self.symbols.intern_type(interface);
            self.graph.add_edge(id, interface);
        }
    }

    fn visit_outer_class(&mut self, outer: &OuterClass) {
        if let Some(class) = self.class {
            let inner = self.symbols.get(class).name().to_string();
            self.add_outer_class(&inner, &outer.owner);
        }
    }

    fn visit_inner_class(&mut self, inner: &InnerClass) {
        if self.class.is_none() {
            return;
        }
        if let Some(outer_name) = &inner.outer_name {
            self.add_outer_class(&inner.name, outer_name);
        }
    }

    fn visit_field(&mut self, field: &MemberHeader<'_>) {
        let Some(class) = self.class else {
            return;
        };
        let id = self
            .symbols
            .intern_field(class, field.name, field.descriptor);
        self.member = Some(id);
        self.graph.add_edge(id, class);
        let field_type = self.symbols.type_of_descriptor(field.descriptor);
        self.add_edge_from_member(field_type);
    }

    fn visit_method(&mut self, method: &MemberHeader<'_>) -> CodeVisit {
        let Some(class) = self.class else {
            return CodeVisit::Skip;
        };
        let id = self
            .symbols
            .intern_method(class, method.name, method.descriptor);
        self.member = Some(id);
        self.graph.add_edge(id, class);

        match method_parts(method.descriptor) {
            Ok(parts) => {
                for field_type in parts.arguments.iter().chain([&parts.return_type]) {
                    let ty = self.symbols.type_of_descriptor(field_type);
                    self.add_edge_from_member(ty);
                }
            }
            Err(err) => warn!("[DEPENDENCIES] {}", err),
        }
        if method.name == "<clinit>" && method.descriptor == "()V" {
            self.graph.add_edge(class, id);
        }
        for exception in method.exceptions {
            let exception = self.symbols.intern_type(exception);
            self.graph.add_edge(id, exception);
        }
        CodeVisit::Visit
    }

    fn visit_instruction(&mut self, instruction: &Instruction) {
        if self.member.is_none() {
            return;
        }
        let target = match instruction {
            Instruction::Field {
                owner,
                name,
                descriptor,
                ..
            } => Some(self.registry.resolve_or_add_field_reference(
                self.symbols,
                owner,
                name,
                descriptor,
            )),
            // Arrays inherit clone() from Object; depend on the element type instead
            Instruction::Method { owner, name, .. }
                if owner.starts_with('[') && name == "clone" =>
            {
                self.symbols.type_of_object_name(owner)
            }
            Instruction::Method {
                owner,
                name,
                descriptor,
                ..
            } => Some(self.registry.resolve_or_add_method_reference(
                self.symbols,
                owner,
                name,
                descriptor,
            )),
            Instruction::Type { operand, .. } => self.symbols.type_of_object_name(operand),
            Instruction::MultiANewArray { descriptor, .. } => {
                self.symbols.type_of_descriptor(descriptor)
            }
        };
        self.add_edge_from_member(target);
    }

    fn visit_try_catch(&mut self, catch_type: Option<&str>) {
        if let (Some(_), Some(catch_type)) = (self.member, catch_type) {
            let ty = self.symbols.intern_type(catch_type);
            self.add_edge_from_member(Some(ty));
        }
    }

    fn visit_local_variable(&mut self, variable: &LocalVariable) {
        if self.member.is_some() && self.debug_info {
            let ty = self.symbols.type_of_descriptor(&variable.descriptor);
            self.add_edge_from_member(ty);
        }
    }

    fn visit_member_end(&mut self) {
        self.member = None;
    }

    fn visit_class_end(&mut self) {
        self.class = None;
    }
}
