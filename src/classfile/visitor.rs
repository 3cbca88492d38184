use std::path::Path;

use super::annotation::Annotation;
use super::code::{Instruction, LocalVariable};
use super::model::{ClassFile, DecodeOptions, InnerClass, OuterClass};

/// Type header delivered when a class is opened.
#[derive(Debug, Clone, Copy)]
pub struct ClassHeader<'a> {
    pub major_version: u16,
    pub access: u16,
    pub name: &'a str,
    pub signature: Option<&'a str>,
    pub super_name: Option<&'a str>,
    pub interfaces: &'a [String],
}

/// Field or method header.
#[derive(Debug, Clone, Copy)]
pub struct MemberHeader<'a> {
    pub access: u16,
    pub name: &'a str,
    pub descriptor: &'a str,
    pub signature: Option<&'a str>,
    pub exceptions: &'a [String],
}

/// Whether a method visit wants the instructions of the method body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeVisit {
    Skip,
    Visit,
}

/// Receives the contents of class files in declaration order.
///
/// Per class the order is: `visit_class`, class annotations, the outer class,
/// inner classes, then each field and method (header, annotations, code
/// callbacks, `visit_member_end`), and finally `visit_class_end`.
pub trait ClassVisitor {
    fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default()
    }

    /// Called once for each archive or directory before its classes.
    fn visit_source(&mut self, _path: &Path) {}

    fn visit_class(&mut self, _class: &ClassHeader<'_>) {}

    /// Annotation on the class or on the member currently being visited.
    fn visit_annotation(&mut self, _annotation: &Annotation) {}

    fn visit_outer_class(&mut self, _outer: &OuterClass) {}

    fn visit_inner_class(&mut self, _inner: &InnerClass) {}

    fn visit_field(&mut self, _field: &MemberHeader<'_>) {}

    fn visit_method(&mut self, _method: &MemberHeader<'_>) -> CodeVisit {
        CodeVisit::Skip
    }

    fn visit_instruction(&mut self, _instruction: &Instruction) {}

    fn visit_try_catch(&mut self, _catch_type: Option<&str>) {}

    fn visit_local_variable(&mut self, _variable: &LocalVariable) {}

    fn visit_member_end(&mut self) {}

    fn visit_class_end(&mut self) {}
}

impl ClassFile {
    /// Replays this class to `visitor`.
    pub fn accept<V: ClassVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_class(&ClassHeader {
            major_version: self.major_version,
            access: self.access,
            name: &self.name,
            signature: self.signature.as_deref(),
            super_name: self.super_name.as_deref(),
            interfaces: &self.interfaces,
        });
        for annotation in &self.annotations {
            visitor.visit_annotation(annotation);
        }
        if let Some(outer) = &self.outer_class {
            visitor.visit_outer_class(outer);
        }
        for inner in &self.inner_classes {
            visitor.visit_inner_class(inner);
        }

        for field in &self.fields {
            visitor.visit_field(&MemberHeader {
                access: field.access,
                name: &field.name,
                descriptor: &field.descriptor,
                signature: field.signature.as_deref(),
                exceptions: &field.exceptions,
            });
            for annotation in &field.annotations {
                visitor.visit_annotation(annotation);
            }
            visitor.visit_member_end();
        }

        for method in &self.methods {
            let wants_code = visitor.visit_method(&MemberHeader {
                access: method.access,
                name: &method.name,
                descriptor: &method.descriptor,
                signature: method.signature.as_deref(),
                exceptions: &method.exceptions,
            });
            for annotation in &method.annotations {
                visitor.visit_annotation(annotation);
            }
            if let (CodeVisit::Visit, Some(code)) = (wants_code, &method.code) {
                for catch_type in &code.catch_types {
                    visitor.visit_try_catch(catch_type.as_deref());
                }
                for instruction in &code.instructions {
                    visitor.visit_instruction(instruction);
                }
                for variable in &code.local_variables {
                    visitor.visit_local_variable(variable);
                }
            }
            visitor.visit_member_end();
        }

        visitor.visit_class_end();
    }
}
