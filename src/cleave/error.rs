use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zip::result::ZipError;

use crate::classfile::{ClassFormatError, SourceError};

/// A whitelist the input archive cannot satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CleaveProblem {
    #[error("File '{file}' does not contain '{id}'.")]
    NotContained { file: String, id: String },
    #[error("Type '{ty}' requires type '{missing}' which is not defined.")]
    MissingSupertype { ty: String, missing: String },
}

/// Errors from reducing an archive. The output file never survives one.
#[derive(Debug, Error)]
pub enum CleaveError {
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n"))]
    Rejected(Vec<CleaveProblem>),
    #[error("Missing definition for '{0}'")]
    MissingDefinition(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error("IO error writing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("archive error writing {}: {source}", .path.display())]
    Zip {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("invalid class file '{entry}': {source}")]
    ClassFile {
        entry: String,
        #[source]
        source: ClassFormatError,
    },
}
