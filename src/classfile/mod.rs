//! Class-file decoding.
//!
//! [`ClassFile::parse`] decodes the parts of a class the analysis needs: the type
//! header, members, annotations, nesting attributes and the reference-bearing
//! instructions of method bodies. [`visit_source`] enumerates the classes of an
//! archive or a class directory and replays each one to a [`ClassVisitor`].
//!
//! [`ClassLayout`] locates member tables so a class can be rewritten without its
//! unwanted fields and methods.

mod annotation;
mod code;
mod constant_pool;
mod error;
mod layout;
mod model;
mod reader;
mod source;
mod visitor;

pub use annotation::{Annotation, AnnotationValue};
pub use code::{Code, Instruction, LocalVariable};
pub use error::{ClassFormatError, SourceError};
pub use layout::{ClassLayout, MemberSpan};
pub use model::{ClassFile, DecodeOptions, InnerClass, Member, OuterClass};
pub use source::{list_archives, visit_source};
pub use visitor::{ClassHeader, ClassVisitor, CodeVisit, MemberHeader};

pub(crate) use source::open_archive;

/// Opcode constants for the instructions reported through [`Instruction`].
pub mod opcodes {
    pub use super::code::{
        ANEWARRAY, CHECKCAST, GETFIELD, GETSTATIC, INSTANCEOF, INVOKEINTERFACE, INVOKESPECIAL,
        INVOKESTATIC, INVOKEVIRTUAL, JSR, JSR_W, MULTIANEWARRAY, NEW, PUTFIELD, PUTSTATIC, RET,
    };
}
