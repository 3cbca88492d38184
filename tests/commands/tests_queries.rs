use rstest::rstest;

use codecleaver::CommandRunner;

use super::{Fixture, errors, quoted, run_ok};
use crate::helpers::{ClassBuilder, write_jar};

#[test]
fn test_open_lists_files() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner();
    let mut expected = vec![
        fixture.library.display().to_string(),
        fixture.runtime.display().to_string(),
    ];
    expected.sort();
    assert_eq!(run_ok(&mut runner, "listOpenFiles"), expected);
    assert_eq!(run_ok(&mut runner, "listSymbolFiles"), expected);
}

#[rstest]
#[case("<p/A.run.()V", &["p/A", "p/B.help.()V"])]
#[case(">p/B.help.()V", &["p/A.run.()V"])]
#[case("[p/A", &["java/lang/Object", "p/I"])]
#[case("]p/I", &["p/A"])]
#[case("[p/A.go.()V", &["p/I.go.()V"])]
#[case("@p/Ann(value=x)", &["p/A"])]
#[case("@p/Ann(x)", &["p/A"])]
#[case("@p/Ann(value=y)", &[])]
#[case("Interfaces - p/Ann", &["p/I"])]
#[case("!p/B", &["p/B.help.()V", "p/B.main.([Ljava/lang/String;)V"])]
fn test_queries_over_opened_archives(#[case] query: &str, #[case] expected: &[&str]) {
    let fixture = Fixture::new();
    let mut runner = fixture.runner();
    assert_eq!(run_ok(&mut runner, query), expected);
}

#[test]
fn test_open_assign_captures_file_symbols() {
    let fixture = Fixture::new();
    let mut runner = CommandRunner::default();
    run_ok(
        &mut runner,
        &format!("openAssign lib {}", quoted(&fixture.library)),
    );
    assert_eq!(
        run_ok(&mut runner, "list lib ^ Types"),
        ["p/A", "p/Ann", "p/B", "p/I"]
    );
}

#[test]
fn test_info_of_opened_class() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner();
    assert_eq!(
        run_ok(&mut runner, "info p/A"),
        [
            "Name: p/A".to_string(),
            "Type: Type".to_string(),
            "Access: 21".to_string(),
            "Parent: p".to_string(),
            "Super: java/lang/Object".to_string(),
            "Interface: p/I".to_string(),
            format!("File: {}", fixture.library.display()),
            "  Annotation 1. Type: p/Ann".to_string(),
            "    value: x".to_string(),
        ]
    );
}

#[test]
fn test_user_sets_survive_reopen() {
    let fixture = Fixture::new();
    let mut runner = fixture.runner();
    run_ok(&mut runner, "keep = p/A.run.()V + p/B.help.()V");
    run_ok(&mut runner, "keep += p/A");
    run_ok(&mut runner, "keep -= p/A");
    assert_eq!(run_ok(&mut runner, "size keep"), ["2"]);

    run_ok(&mut runner, &format!("close {}", quoted(&fixture.library)));
    run_ok(&mut runner, &format!("open {}", quoted(&fixture.library)));
    assert_eq!(
        run_ok(&mut runner, "list keep"),
        ["p/A.run.()V", "p/B.help.()V"]
    );
}

#[test]
fn test_duplicate_classes_are_ignored_with_warning() {
    let fixture = Fixture::new();
    let duplicate = fixture.path("dup.jar");
    write_jar(
        &duplicate,
        &[(
            "p/B.class",
            ClassBuilder::new("p/B", Some("java/lang/Object")).build(),
        )],
    );
    let mut runner = fixture.runner();
    run_ok(&mut runner, &format!("open {}", quoted(&duplicate)));

    let out = runner.run_line("p/B");
    assert!(!out.has_errors());
    assert_eq!(
        out.diagnostics[0].message,
        format!(
            "Ignoring duplicate definition of 'p/B' in file '{}'.",
            duplicate.display()
        )
    );
    assert_eq!(run_ok(&mut runner, "!p/B").len(), 2);
}

#[test]
fn test_open_missing_archive() {
    let fixture = Fixture::new();
    let mut runner = CommandRunner::default();
    let found = errors(
        &mut runner,
        &format!("open {}", quoted(&fixture.path("absent.jar"))),
    );
    assert_eq!(found.len(), 1);
    assert!(found[0].contains("absent.jar"), "{}", found[0]);
}
