use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

use crate::classfile::SourceError;
use crate::semantic::SplitNestingError;

/// A rebuild or file operation that could not complete. The session is left
/// as it was before the call.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("'{source}' reading jar file '{}'.", .path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: SourceError,
    },
    #[error(transparent)]
    SplitNesting(#[from] SplitNestingError),
}

impl From<SourceError> for SessionError {
    fn from(source: SourceError) -> Self {
        SessionError::Source {
            path: source.path().clone(),
            source,
        }
    }
}

/// A rejected change to a named set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("No set named '{0}'.")]
    Missing(SmolStr),
    #[error("Cannot modify predefined set '{0}'.")]
    Predefined(SmolStr),
    #[error("'{0}' is not a valid set name")]
    InvalidName(SmolStr),
    #[error("'{0}' is not a valid new set name")]
    InvalidNewName(SmolStr),
}
