use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::classfile::AnnotationValue;
use crate::semantic::symbol_table::SymbolId;

use super::access::AccessFlags;

/// An annotation attached to a definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub type_id: SymbolId,
    pub elements: IndexMap<SmolStr, AnnotationValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDefinition {
    pub super_type: Option<SymbolId>,
    pub interfaces: Vec<SymbolId>,
    /// Archive or directory the type was read from.
    pub file: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionKind {
    Package,
    Type(TypeDefinition),
    Method { descriptor: SmolStr },
    Field { descriptor: SmolStr },
}

/// What a scanned binary says about one identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub id: SymbolId,
    pub access: AccessFlags,
    pub annotations: IndexMap<SymbolId, Annotation>,
    pub kind: DefinitionKind,
    /// Kept in step with the identifier's parent; change it through
    /// [`Registry::set_parent`](super::Registry::set_parent).
    pub(super) parent: Option<SymbolId>,
}

impl Definition {
    pub fn new(id: SymbolId, parent: SymbolId, access: AccessFlags, kind: DefinitionKind) -> Self {
        Self {
            id,
            access,
            annotations: IndexMap::new(),
            kind,
            parent: Some(parent),
        }
    }

    pub fn with_annotations(mut self, annotations: impl IntoIterator<Item = Annotation>) -> Self {
        for annotation in annotations {
            self.annotations.insert(annotation.type_id, annotation);
        }
        self
    }

    pub fn parent(&self) -> Option<SymbolId> {
        self.parent
    }

    pub fn as_type(&self) -> Option<&TypeDefinition> {
        match &self.kind {
            DefinitionKind::Type(ty) => Some(ty),
            _ => None,
        }
    }

    /// The originating file of a type; packages report `<Package>` and members
    /// have none of their own.
    pub fn file(&self) -> Option<&str> {
        match &self.kind {
            DefinitionKind::Type(ty) => Some(&ty.file),
            DefinitionKind::Package => Some("<Package>"),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> Option<&str> {
        match &self.kind {
            DefinitionKind::Method { descriptor } | DefinitionKind::Field { descriptor } => {
                Some(descriptor)
            }
            _ => None,
        }
    }

    pub fn is_interface(&self) -> bool {
        matches!(self.kind, DefinitionKind::Type(_)) && self.access.is_interface()
    }
}
