#![allow(clippy::unwrap_used)]

mod tests_named_sets;

use crate::semantic::SymbolSet;
use crate::semantic::symbol_table::SymbolId;

use super::Session;

/// Interns `names` as types and returns them as a set.
pub(super) fn types(session: &mut Session, names: &[&str]) -> SymbolSet {
    names
        .iter()
        .map(|name| session.symbols.intern_type(name))
        .collect()
}

pub(super) fn names(session: &Session, set: &SymbolSet) -> Vec<String> {
    let mut names: Vec<String> = set
        .iter()
        .map(|id| session.symbols().display(*id).to_string())
        .collect();
    names.sort();
    names
}

pub(super) fn single(id: SymbolId) -> SymbolSet {
    [id].into_iter().collect()
}
