use std::path::Path;

use smol_str::SmolStr;
use tracing::{info, warn};

use crate::classfile::{self, ClassHeader, ClassVisitor, CodeVisit, DecodeOptions, MemberHeader};
use crate::semantic::registry::{
    AccessFlags, Annotation, Definition, DefinitionKind, Registry, RegistryError, TypeDefinition,
};
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

/// A class skipped because its type (or an enclosing type from another file)
/// was already defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredDefinition {
    pub type_id: SymbolId,
    pub file: SmolStr,
}

struct PendingClass {
    id: SymbolId,
    access: AccessFlags,
    super_type: Option<SymbolId>,
    interfaces: Vec<SymbolId>,
    annotations: Vec<Annotation>,
    defined: bool,
}

struct PendingMember {
    id: SymbolId,
    access: AccessFlags,
    kind: DefinitionKind,
    annotations: Vec<Annotation>,
}

/// First pass: creates a definition for every type, field and method.
///
/// The type definition is created lazily, on the first finished member or at
/// class end, so that all class annotations are attached to it.
pub struct DefinitionBuilder<'a> {
    symbols: &'a mut SymbolTable,
    registry: &'a mut Registry,
    file: SmolStr,
    class: Option<PendingClass>,
    member: Option<PendingMember>,
    ignored: Vec<IgnoredDefinition>,
}

impl<'a> DefinitionBuilder<'a> {
    pub fn new(symbols: &'a mut SymbolTable, registry: &'a mut Registry) -> Self {
        Self {
            symbols,
            registry,
            file: SmolStr::default(),
            class: None,
            member: None,
            ignored: Vec::new(),
        }
    }

    /// The classes that were skipped as duplicates.
    pub fn finish(self) -> Vec<IgnoredDefinition> {
        self.ignored
    }

    fn is_duplicate(&self, id: SymbolId) -> bool {
        if self.registry.contains(id) {
            return true;
        }
        let mut outer = self.symbols.outer_type(id);
        while let Some(ty) = outer {
            if let Some(file) = self.registry.get(ty).and_then(|d| d.file()) {
                if file != self.file {
                    return true;
                }
            }
            outer = self.symbols.outer_type(ty);
        }
        false
    }

    fn define_pending_class(&mut self) -> Result<(), RegistryError> {
        let Some(class) = self.class.as_mut().filter(|c| !c.defined) else {
            return Ok(());
        };
        class.defined = true;
        let (id, access) = (class.id, class.access);
        let kind = DefinitionKind::Type(TypeDefinition {
            super_type: class.super_type,
            interfaces: std::mem::take(&mut class.interfaces),
            file: self.file.clone(),
        });
        let annotations = std::mem::take(&mut class.annotations);

        let parent = self.registry.best_guess_container_of(self.symbols, id)?;
        self.registry.define(
            self.symbols,
            Definition::new(id, parent, access, kind).with_annotations(annotations),
        )
    }

    fn convert_annotation(&mut self, annotation: &classfile::Annotation) -> Option<Annotation> {
        let type_id = self.symbols.type_of_descriptor(&annotation.descriptor)?;
        Some(Annotation {
            type_id,
            elements: annotation
                .elements
                .iter()
                .map(|(name, value)| (SmolStr::new(name), value.clone()))
                .collect(),
        })
    }

    fn begin_member(&mut self, header: &MemberHeader<'_>, is_method: bool) {
        let Some(owner) = self.class.as_ref().map(|c| c.id) else {
            return;
        };
        let descriptor = SmolStr::new(header.descriptor);
        let (id, kind) = if is_method {
            (
                self.symbols
                    .intern_method(owner, header.name, header.descriptor),
                DefinitionKind::Method { descriptor },
            )
        } else {
            (
                self.symbols
                    .intern_field(owner, header.name, header.descriptor),
                DefinitionKind::Field { descriptor },
            )
        };
        self.member = Some(PendingMember {
            id,
            access: AccessFlags::new(header.access),
            kind,
            annotations: Vec::new(),
        });
    }
}

impl ClassVisitor for DefinitionBuilder<'_> {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::declarations()
    }

    fn visit_source(&mut self, path: &Path) {
        self.file = SmolStr::new(path.to_string_lossy());
    }

    fn visit_class(&mut self, class: &ClassHeader<'_>) {
        let id = self.symbols.intern_type(class.name);
        if self.is_duplicate(id) {
            info!(
                "[DEFINITIONS] ignoring duplicate definition of {} in {}",
                class.name, self.file
            );
            self.ignored.push(IgnoredDefinition {
                type_id: id,
                file: self.file.clone(),
            });
            self.class = None;
            return;
        }

        let super_type = class.super_name.map(|name| self.symbols.intern_type(name));
        let interfaces = class
            .interfaces
            .iter()
            .map(|name| self.symbols.intern_type(name))
            .collect();
        self.class = Some(PendingClass {
            id,
            access: AccessFlags::new(class.access),
            super_type,
            interfaces,
            annotations: Vec::new(),
            defined: false,
        });
    }

    fn visit_annotation(&mut self, annotation: &classfile::Annotation) {
        if self.class.is_none() {
            return;
        }
        let Some(annotation) = self.convert_annotation(annotation) else {
            return;
        };
        match (&mut self.member, &mut self.class) {
            (Some(member), _) => member.annotations.push(annotation),
            (None, Some(class)) => class.annotations.push(annotation),
            (None, None) => {}
        }
    }

    fn visit_field(&mut self, field: &MemberHeader<'_>) {
        self.begin_member(field, false);
    }

    fn visit_method(&mut self, method: &MemberHeader<'_>) -> CodeVisit {
        self.begin_member(method, true);
        CodeVisit::Skip
    }

    fn visit_member_end(&mut self) {
        let Some(member) = self.member.take() else {
            return;
        };
        let Some(owner) = self.class.as_ref().map(|c| c.id) else {
            return;
        };
        let id = member.id;
        let definition = Definition::new(id, owner, member.access, member.kind)
            .with_annotations(member.annotations);
        let result = match self.define_pending_class() {
            Ok(()) => self.registry.define(self.symbols, definition),
            Err(err) => Err(err),
        };
        if let Err(err) = result {
            warn!(
                "[DEFINITIONS] skipping {}: {}",
                self.symbols.display(id),
                err
            );
        }
    }

    fn visit_class_end(&mut self) {
        if let Err(err) = self.define_pending_class() {
            warn!("[DEFINITIONS] skipping class in {}: {}", self.file, err);
        }
        self.class = None;
    }
}
