//! End-to-end tests: archives are written to a temporary directory, opened
//! through the command runner and queried or cleaved.

#![allow(clippy::unwrap_used)]

pub mod tests_cleave;
pub mod tests_queries;

use std::path::{Path, PathBuf};

use codecleaver::CommandRunner;
use tempfile::TempDir;

use crate::helpers::class_builder::{
    ACC_ABSTRACT, ACC_ANNOTATION, ACC_INTERFACE, ACC_PUBLIC, ACC_STATIC, Call,
};
use crate::helpers::{ClassBuilder, write_jar};

pub const MANIFEST: &str = "Manifest-Version: 1.0\r\nMain-Class: p.B\r\n\r\n";

/// Archives for one test: `rt.jar` holds `java/lang/Object`, `lib.jar` the
/// application classes.
pub struct Fixture {
    pub dir: TempDir,
    pub runtime: PathBuf,
    pub library: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let runtime = dir.path().join("rt.jar");
        let library = dir.path().join("lib.jar");
        write_jar(&runtime, &[("java/lang/Object.class", object_class())]);
        write_jar(&library, &library_entries());
        Self {
            dir,
            runtime,
            library,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A runner with both archives open.
    pub fn runner(&self) -> CommandRunner {
        let mut runner = CommandRunner::default();
        run_ok(&mut runner, &format!("open {}", quoted(&self.runtime)));
        run_ok(&mut runner, &format!("open {}", quoted(&self.library)));
        runner
    }
}

pub fn quoted(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

/// Runs `line` and asserts it reported no errors.
pub fn run_ok(runner: &mut CommandRunner, line: &str) -> Vec<String> {
    let out = runner.run_line(line);
    assert!(!out.has_errors(), "{line}: {:?}", out.diagnostics);
    out.lines
}

pub fn errors(runner: &mut CommandRunner, line: &str) -> Vec<String> {
    runner
        .run_line(line)
        .diagnostics
        .into_iter()
        .filter(|d| d.is_error())
        .map(|d| d.message)
        .collect()
}

fn object_class() -> Vec<u8> {
    ClassBuilder::new("java/lang/Object", None)
        .method(ACC_PUBLIC, "<init>", "()V", &[])
        .build()
}

/// `p/A implements p/I` and calls `p/B.help`; `p/A` carries `@p/Ann("x")`.
fn library_entries() -> Vec<(&'static str, Vec<u8>)> {
    let interface = ClassBuilder::interface("p/I")
        .abstract_method(ACC_PUBLIC | ACC_ABSTRACT, "go", "()V")
        .build();
    let annotation = ClassBuilder::interface("p/Ann")
        .access(ACC_PUBLIC | ACC_INTERFACE | ACC_ABSTRACT | ACC_ANNOTATION)
        .abstract_method(ACC_PUBLIC | ACC_ABSTRACT, "value", "()Ljava/lang/String;")
        .build();
    let a = ClassBuilder::new("p/A", Some("java/lang/Object"))
        .implements("p/I")
        .annotation("p/Ann", &[("value", "x")])
        .field(ACC_PUBLIC, "count", "I")
        .method(
            ACC_PUBLIC,
            "<init>",
            "()V",
            &[Call::special("java/lang/Object", "<init>", "()V")],
        )
        .method(ACC_PUBLIC, "go", "()V", &[])
        .method(
            ACC_PUBLIC,
            "run",
            "()V",
            &[Call::invoke_static("p/B", "help", "()V")],
        )
        .build();
    let b = ClassBuilder::new("p/B", Some("java/lang/Object"))
        .method(ACC_PUBLIC | ACC_STATIC, "help", "()V", &[])
        .method(
            ACC_PUBLIC | ACC_STATIC,
            "main",
            "([Ljava/lang/String;)V",
            &[],
        )
        .build();

    vec![
        ("META-INF/MANIFEST.MF", MANIFEST.as_bytes().to_vec()),
        ("p/A.class", a),
        ("p/Ann.class", annotation),
        ("p/B.class", b),
        ("p/I.class", interface),
        ("p/readme.txt", b"resource".to_vec()),
    ]
}
