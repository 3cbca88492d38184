use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

use crate::base::DescriptorError;

/// Errors that can occur while decoding a single class file.
#[derive(Debug, Error)]
pub enum ClassFormatError {
    #[error("unexpected end of class file data")]
    UnexpectedEof,
    #[error("invalid class file magic: {0:#010x}")]
    InvalidMagic(u32),
    #[error("unsupported constant pool tag {tag}")]
    UnsupportedConstant { tag: u8 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("constant pool entry {index} is not a {expected}")]
    UnexpectedConstant { index: u16, expected: &'static str },
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },
    #[error("invalid annotation element tag '{0}'")]
    InvalidElementTag(char),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Errors raised while enumerating the classes of an archive or directory.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("IO error while reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("archive error while reading {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("invalid class file '{entry}' in {}: {source}", .path.display())]
    ClassFile {
        path: PathBuf,
        entry: String,
        #[source]
        source: ClassFormatError,
    },
}

impl SourceError {
    /// The archive or directory the error was raised for.
    pub fn path(&self) -> &PathBuf {
        match self {
            SourceError::Io { path, .. }
            | SourceError::Zip { path, .. }
            | SourceError::ClassFile { path, .. } => path,
        }
    }
}
