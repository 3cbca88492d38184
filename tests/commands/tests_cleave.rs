use std::path::Path;

use codecleaver::CommandRunner;
use codecleaver::classfile::{ClassFile, DecodeOptions};

use super::{Fixture, MANIFEST, errors, quoted, run_ok};
use crate::helpers::{read_jar, write_jar};

fn cleave(fixture: &Fixture, output: &Path, whitelist: &str) -> String {
    let input = quoted(&fixture.library);
    format!("cleave {} {} {}", input, quoted(output), whitelist)
}

fn names(entries: &[(String, Vec<u8>)]) -> Vec<&str> {
    entries.iter().map(|(name, _)| name.as_str()).collect()
}

fn entry<'a>(entries: &'a [(String, Vec<u8>)], name: &str) -> &'a [u8] {
    &entries.iter().find(|(n, _)| n == name).unwrap().1
}

#[test]
fn test_cleave_keeps_whitelisted_classes_and_members() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = fixture.runner();

    let whitelist = "p/A + p/A.<init>.()V + p/A.count.I + p/I + p/I.go.()V";
    run_ok(&mut runner, &cleave(&fixture, &output, whitelist));

    let entries = read_jar(&output);
    assert_eq!(
        names(&entries),
        ["META-INF/MANIFEST.MF", "p/A.class", "p/I.class", "p/readme.txt"]
    );
    assert_eq!(entry(&entries, "p/readme.txt"), b"resource");

    let class = ClassFile::parse(entry(&entries, "p/A.class"), DecodeOptions::default()).unwrap();
    assert_eq!(class.name, "p/A");
    assert_eq!(class.interfaces, ["p/I"]);
    assert_eq!(class.annotations.len(), 1);
    let fields: Vec<&str> = class.fields.iter().map(|f| f.name.as_str()).collect();
    let methods: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(fields, ["count"]);
    assert_eq!(methods, ["<init>"]);
}

#[test]
fn test_cleave_drops_main_class_of_removed_type() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = fixture.runner();

    run_ok(&mut runner, &cleave(&fixture, &output, "p/A"));
    let entries = read_jar(&output);
    assert_eq!(
        entry(&entries, "META-INF/MANIFEST.MF"),
        b"Manifest-Version: 1.0\r\n\r\n"
    );
}

#[test]
fn test_cleave_keeps_main_class_of_kept_type() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = fixture.runner();

    run_ok(&mut runner, &cleave(&fixture, &output, "p/B"));
    let entries = read_jar(&output);
    assert_eq!(entry(&entries, "META-INF/MANIFEST.MF"), MANIFEST.as_bytes());
    let class = ClassFile::parse(entry(&entries, "p/B.class"), DecodeOptions::default()).unwrap();
    assert!(class.methods.is_empty());
}

#[test]
fn test_cleave_rejects_missing_supertype() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = CommandRunner::default();
    run_ok(&mut runner, &format!("open {}", quoted(&fixture.library)));

    let found = errors(&mut runner, &cleave(&fixture, &output, "p/A"));
    assert_eq!(
        found,
        ["Type 'p/A' requires type 'java/lang/Object' which is not defined."]
    );
    assert!(!output.exists());
}

#[test]
fn test_cleave_rejects_symbols_from_other_files() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = fixture.runner();

    let found = errors(
        &mut runner,
        &cleave(&fixture, &output, "p/A + java/lang/Object"),
    );
    let expected = format!(
        "File '{}' does not contain 'java/lang/Object'.",
        fixture.library.display()
    );
    assert_eq!(found, [expected]);
    assert!(!output.exists());
}

#[test]
fn test_cleave_removes_output_after_bad_class() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    let mut runner = fixture.runner();
    let truncated = b"\xca\xfe\xba\xbe".to_vec();
    write_jar(&fixture.library, &[("p/A.class", truncated)]);

    let found = errors(&mut runner, &cleave(&fixture, &output, "p/A"));
    assert_eq!(found.len(), 1);
    assert!(found[0].starts_with("IO Error '"));
    assert!(!output.exists());
}

#[test]
fn test_cleave_keeps_existing_output_when_input_is_gone() {
    let fixture = Fixture::new();
    let output = fixture.path("out.jar");
    std::fs::write(&output, b"previous").unwrap();
    let mut runner = fixture.runner();
    std::fs::remove_file(&fixture.library).unwrap();

    let found = errors(&mut runner, &cleave(&fixture, &output, "p/A"));
    assert_eq!(found.len(), 1);
    assert_eq!(std::fs::read(&output).unwrap(), b"previous");
}
