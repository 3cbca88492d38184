//! Errors reported while scanning, parsing or evaluating a query.

use thiserror::Error;

use crate::base::TextRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// Malformed token.
    Scan,
    /// Unexpected token.
    Parse,
    /// Unresolved identifier, invalid set name and similar.
    Semantic,
}

/// An error with the byte range of the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct QueryError {
    pub kind: QueryErrorKind,
    pub message: String,
    pub range: TextRange,
}

impl QueryError {
    pub fn new(kind: QueryErrorKind, message: impl Into<String>, range: TextRange) -> Self {
        Self {
            kind,
            message: message.into(),
            range,
        }
    }

    pub fn scan(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(QueryErrorKind::Scan, message, range)
    }

    pub fn parse(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(QueryErrorKind::Parse, message, range)
    }

    pub fn semantic(message: impl Into<String>, range: TextRange) -> Self {
        Self::new(QueryErrorKind::Semantic, message, range)
    }
}
