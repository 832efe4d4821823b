//! Behaviour tests running query scripts against parsed Rust sources.

use std::cell::RefCell;

use nodequery::{DriverError, DriverOutcome, Script, ScriptDriver, ScriptSet};
use nodequery_core::{Diagnostic, DiagnosticEngine};
use nodequery_syntax::{ParseResult, Parser, SupportedLanguage};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Scripts referenced by name from the feature file.
fn canned_script(name: &str) -> &'static str {
    match name {
        "function-names" => concat!(
            "# Report every zero-argument function.\n",
            "let Diagnostic \"function %0 defined\"\n",
            "let DiagnosticArgs \"NAME\"\n",
            "match fn $NAME() {}\n",
        ),
        "function-roots" => "let Diagnostic \"found %0\"\nmatch fn $NAME() {}\n",
        "named-pattern" => concat!(
            "let fns fn $NAME() {}\n",
            "let Diagnostic \"function %0\"\n",
            "let DiagnosticArgs \"NAME\"\n",
            "match @fns\n",
        ),
        "call-arguments" => concat!(
            "let Diagnostic \"log called with (%0)\"\n",
            "let DiagnosticArgs \"ARGS\"\n",
            "match log($$$ARGS)\n",
        ),
        "missing-binding" => concat!(
            "let Diagnostic \"%0 calls %1\"\n",
            "let DiagnosticArgs \"root CALLEE\"\n",
            "match fn $NAME() {}\n",
        ),
        "quit-early" => "let Diagnostic \"found %0\"\nquit\nmatch fn $NAME() {}\n",
        "bad-traversal" => "# Unknown kinds are rejected.\nset traversal bogus-kind\n",
        other => panic!("no canned script named {other}"),
    }
}

#[derive(Default)]
struct TestWorld {
    source: Option<ParseResult>,
    scripts: ScriptSet,
    output: String,
    diagnostics: Vec<Diagnostic>,
    result: Option<Result<DriverOutcome, DriverError>>,
}

#[fixture]
fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

fn strip_quotes(s: &str) -> &str {
    s.trim_matches('"')
}

#[given("the Rust source {source}")]
fn given_rust_source(world: &RefCell<TestWorld>, source: String) {
    let text = strip_quotes(&source).replace("\\n", "\n");
    let mut parser = Parser::new(SupportedLanguage::Rust).expect("parser init");
    world.borrow_mut().source = Some(parser.parse(&text).expect("parse"));
}

#[given("the script {name}")]
fn given_script(world: &RefCell<TestWorld>, name: String) {
    let script_name = strip_quotes(&name);
    world
        .borrow_mut()
        .scripts
        .push(Script::new(script_name, canned_script(script_name)));
}

#[when("the scripts run")]
fn when_scripts_run(world: &RefCell<TestWorld>) {
    let mut w = world.borrow_mut();
    let source = w.source.take().expect("source parsed");
    let mut engine = DiagnosticEngine::new();
    let mut output = Vec::new();

    let result = ScriptDriver::new(&w.scripts).run(&source, &mut output, &mut engine);

    w.output = String::from_utf8(output).expect("query output is UTF-8");
    w.diagnostics = engine.take_diagnostics();
    w.result = Some(result);
    w.source = Some(source);
}

#[then("the run completes")]
fn then_run_completes(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(w.result, Some(Ok(DriverOutcome::Completed))));
}

#[then("the run is terminated")]
fn then_run_terminated(world: &RefCell<TestWorld>) {
    let w = world.borrow();
    assert!(matches!(w.result, Some(Ok(DriverOutcome::Terminated))));
}

#[then("the run fails at line {line} of {script}")]
fn then_run_fails(world: &RefCell<TestWorld>, line: usize, script: String) {
    let w = world.borrow();
    let Some(Err(err)) = &w.result else {
        panic!("expected a failed run, got {:?}", w.result);
    };
    assert_eq!(err.script(), strip_quotes(&script));
    assert_eq!(err.line(), line);
}

#[then("{count} diagnostics are emitted")]
fn then_diagnostic_count(world: &RefCell<TestWorld>, count: usize) {
    assert_eq!(world.borrow().diagnostics.len(), count);
}

#[then("diagnostic {index} reads {message}")]
fn then_diagnostic_reads(world: &RefCell<TestWorld>, index: usize, message: String) {
    let w = world.borrow();
    let diagnostic = w.diagnostics.get(index - 1).expect("diagnostic exists");
    assert_eq!(diagnostic.message(), strip_quotes(&message));
}

#[then("diagnostic {index} starts at line {line} column {column}")]
fn then_diagnostic_location(world: &RefCell<TestWorld>, index: usize, line: u32, column: u32) {
    let w = world.borrow();
    let diagnostic = w.diagnostics.get(index - 1).expect("diagnostic exists");
    assert_eq!(diagnostic.location().one_based(), (line, column));
}

#[then("the output contains {text}")]
fn then_output_contains(world: &RefCell<TestWorld>, text: String) {
    let w = world.borrow();
    let expected = strip_quotes(&text);
    assert!(w.output.contains(expected), "output was {:?}", w.output);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "Every zero-argument function is reported by name"
)]
fn function_names_are_reported(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "The matched root is the default diagnostic argument"
)]
fn root_is_the_default_argument(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "Named patterns can be matched by reference"
)]
fn named_patterns_match_by_reference(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "Empty argument sequences have no location and are skipped"
)]
fn empty_sequences_are_skipped(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "A missing binding stops the run"
)]
fn missing_binding_stops_the_run(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "Quit skips the rest of the run"
)]
fn quit_skips_the_rest(world: RefCell<TestWorld>) {
    drop(world);
}

#[scenario(
    path = "tests/features/query_scripts.feature",
    name = "An unknown traversal kind fails without changing the session"
)]
fn unknown_traversal_fails(world: RefCell<TestWorld>) {
    drop(world);
}
