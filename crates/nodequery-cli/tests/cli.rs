//! Integration tests for the `nodequery` binary.
//!
//! Runs real scripts over real files and checks the rendered diagnostics,
//! exit statuses, and error reporting seen by a user.

use std::fs;
use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use tempfile::TempDir;

fn fixture(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    Path::new(&path).to_str().expect("utf-8 path").to_owned()
}

#[test]
fn renders_human_diagnostics_with_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = fixture(
        &dir,
        "calls.nq",
        "let Diagnostic \"call to %0\"\nlet DiagnosticArgs \"CALLEE\"\nmatch $CALLEE()\n",
    );
    let source = fixture(&dir, "main.rs", "fn main() {\n    run();\n}\n");

    let mut command = cargo_bin_cmd!("nodequery");
    command.args(["--format", "human", "-s", &script, &source]);
    command
        .assert()
        .success()
        .stdout(contains("warning: call to run"))
        .stdout(contains(format!("--> {source}:2:5")))
        .stdout(contains("2 |     run();"))
        .stdout(contains("  |     ^~~\n"));
}

#[test]
fn python_sources_are_detected_by_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = fixture(
        &dir,
        "defs.nq",
        "let Diagnostic \"def %0\"\nlet DiagnosticArgs \"NAME\"\nmatch def $NAME(): pass\n",
    );
    let source = fixture(&dir, "app.py", "def ready(): pass\n");

    let mut command = cargo_bin_cmd!("nodequery");
    command.args(["--format", "json", "-s", &script, &source]);
    command
        .assert()
        .success()
        .stdout(contains("\"message\":\"def ready\""));
}

#[test]
fn missing_binding_fails_the_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = fixture(
        &dir,
        "broken.nq",
        "let Diagnostic \"%0 calls %1\"\nlet DiagnosticArgs \"root CALLEE\"\nmatch fn $NAME() {}\n",
    );
    let source = fixture(&dir, "lib.rs", "fn a() {}\n");

    let mut command = cargo_bin_cmd!("nodequery");
    command.args(["-s", &script, &source]);
    command
        .assert()
        .failure()
        .stdout(contains("Couldn't find bound node 'CALLEE'"))
        .stderr(contains(format!("Error: query execution failed in {script} at line 3")));
}

#[test]
fn missing_source_file_is_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let script = fixture(&dir, "q.nq", "help\n");

    let mut command = cargo_bin_cmd!("nodequery");
    command.args(["-s", &script, "/nonexistent/lib.rs"]);
    command
        .assert()
        .failure()
        .stderr(contains("failed to read source file /nonexistent/lib.rs"));
}

#[test]
fn sources_are_required() {
    let mut command = cargo_bin_cmd!("nodequery");
    command.args(["-s", "q.nq"]);
    command
        .assert()
        .failure()
        .stderr(contains("SOURCE").and(contains("required")));
}
