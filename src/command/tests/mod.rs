#![allow(clippy::unwrap_used)]


use crate::semantic::registry::{AccessFlags, Definition, DefinitionKind, TypeDefinition};
use crate::semantic::symbol_table::SymbolId;

use super::{CommandOutput, CommandRunner};

/// A runner whose model has dependencies `p/A -> p/B -> p/C` and
/// `p/A -> p/I`, with `p/A` and `p/B` defined.
pub(super) fn runner() -> CommandRunner {
    let mut runner = CommandRunner::default();
    let session = runner.session_mut();
    let [a, b, c, i] = ["p/A", "p/B", "p/C", "p/I"].map(|n| session.symbols.intern_type(n));
    session.model.dependencies.add_edge(a, b);
    session.model.dependencies.add_edge(b, c);
    session.model.dependencies.add_edge(a, i);
    define_type(&mut runner, a, AccessFlags::PUBLIC, &[i]);
    define_type(
        &mut runner,
        b,
        AccessFlags::PUBLIC | AccessFlags::FINAL,
        &[],
    );
    runner
}

pub(super) fn define_type(
    runner: &mut CommandRunner,
    id: SymbolId,
    access: u16,
    interfaces: &[SymbolId],
) {
    let session = runner.session_mut();
    let parent = session
        .model
        .registry
        .best_guess_container_of(&mut session.symbols, id)
        .unwrap();
    let kind = DefinitionKind::Type(TypeDefinition {
        super_type: Some(session.symbols.object()),
        interfaces: interfaces.to_vec(),
        file: "lib.jar".into(),
    });
    session
        .model
        .registry
        .define(
            &mut session.symbols,
            Definition::new(id, parent, AccessFlags::new(access), kind),
        )
        .unwrap();
}

/// Runs `line` and asserts it reported nothing.
pub(super) fn ok(runner: &mut CommandRunner, line: &str) -> Vec<String> {
    let out = runner.run_line(line);
    assert!(out.diagnostics.is_empty(), "{line}: {:?}", out.diagnostics);
    out.lines
}

/// Runs `line` and returns its diagnostic messages.
pub(super) fn messages(runner: &mut CommandRunner, line: &str) -> Vec<String> {
    let out: CommandOutput = runner.run_line(line);
    out.diagnostics.into_iter().map(|d| d.message).collect()
}
