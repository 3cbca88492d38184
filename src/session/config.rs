//! Session configuration

use smol_str::SmolStr;

use crate::semantic::symbol_table::OBJECT;

/// Settings fixed for the lifetime of a [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// File extensions treated as archives when a directory is opened.
    pub archive_extensions: Vec<SmolStr>,
    /// Whether local-variable descriptors contribute dependencies.
    pub include_debug_info: bool,
    /// Internal name of the universal root type.
    pub root_type: SmolStr,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            archive_extensions: vec![SmolStr::new_static("jar")],
            include_debug_info: true,
            root_type: SmolStr::new_static(OBJECT),
        }
    }
}

impl SessionConfig {
    pub fn with_archive_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.archive_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_debug_info(mut self, include: bool) -> Self {
        self.include_debug_info = include;
        self
    }

    pub fn with_root_type(mut self, root_type: impl Into<SmolStr>) -> Self {
        self.root_type = root_type.into();
        self
    }
}
