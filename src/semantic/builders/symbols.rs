use crate::classfile::{ClassHeader, ClassVisitor, CodeVisit, DecodeOptions, MemberHeader};
use crate::semantic::SymbolSet;
use crate::semantic::symbol_table::{SymbolId, SymbolTable};

/// Collects the symbols a binary declares: each type, its package, and its
/// fields and methods. Nothing is defined or linked.
pub struct SymbolCollector<'a> {
    symbols: &'a mut SymbolTable,
    collected: SymbolSet,
    class: Option<SymbolId>,
}

impl<'a> SymbolCollector<'a> {
    pub fn new(symbols: &'a mut SymbolTable) -> Self {
        Self {
            symbols,
            collected: SymbolSet::default(),
            class: None,
        }
    }

    pub fn finish(self) -> SymbolSet {
        self.collected
    }
}

impl ClassVisitor for SymbolCollector<'_> {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::declarations()
    }

    fn visit_class(&mut self, class: &ClassHeader<'_>) {
        let id = self.symbols.intern_type(class.name);
        let package = match class.name.rfind('/') {
            Some(slash) => self.symbols.intern_package(&class.name[..slash]),
            None => self.symbols.root(),
        };
        self.collected.insert(id);
        self.collected.insert(package);
        self.class = Some(id);
    }

    fn visit_field(&mut self, field: &MemberHeader<'_>) {
        if let Some(class) = self.class {
            let id = self
                .symbols
                .intern_field(class, field.name, field.descriptor);
            self.collected.insert(id);
        }
    }

    fn visit_method(&mut self, method: &MemberHeader<'_>) -> CodeVisit {
        if let Some(class) = self.class {
            let id = self
                .symbols
                .intern_method(class, method.name, method.descriptor);
            self.collected.insert(id);
        }
        CodeVisit::Skip
    }

    fn visit_class_end(&mut self) {
        self.class = None;
    }
}
