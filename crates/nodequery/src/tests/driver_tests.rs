//! Running script sets.

use nodequery_core::DiagnosticEngine;
use rstest::{fixture, rstest};

use super::support::{FakeMatch, FakeTree, spelled};
use crate::{DriverError, DriverOutcome, QueryError, Script, ScriptDriver, ScriptSet};

#[fixture]
fn tree() -> FakeTree {
    FakeTree::default().with_matches(
        "call()",
        vec![
            FakeMatch::at(spelled(0, 0, "a()")),
            FakeMatch::at(spelled(4, 2, "b()")),
        ],
    )
}

struct Run {
    result: Result<DriverOutcome, DriverError>,
    output: String,
    engine: DiagnosticEngine,
}

fn run(tree: &FakeTree, scripts: &[(&str, &str)]) -> Run {
    let set: ScriptSet = scripts
        .iter()
        .map(|(name, contents)| Script::new(*name, *contents))
        .collect();
    let mut engine = DiagnosticEngine::new();
    let mut output = Vec::new();
    let result = ScriptDriver::new(&set).run(tree, &mut output, &mut engine);
    Run {
        result,
        output: String::from_utf8(output).expect("query output is UTF-8"),
        engine,
    }
}

#[rstest]
fn scripts_run_in_order_with_fresh_sessions(tree: FakeTree) {
    let outcome = run(
        &tree,
        &[
            ("first.nq", "let Diagnostic \"first %0\"\nmatch call()\n"),
            ("second.nq", "match call()\n"),
            ("third.nq", "let Diagnostic \"third %0\"\nmatch call()"),
        ],
    );

    assert_eq!(outcome.result.ok(), Some(DriverOutcome::Completed));
    let messages: Vec<_> = outcome
        .engine
        .diagnostics()
        .iter()
        .map(|d| d.message().to_owned())
        .collect();
    assert_eq!(
        messages,
        ["first a()", "first b()", "third a()", "third b()"]
    );
}

#[rstest]
fn quit_stops_the_whole_run(tree: FakeTree) {
    let outcome = run(
        &tree,
        &[
            ("stop.nq", "let Diagnostic \"x\"\nquit\nmatch call()\n"),
            ("never.nq", "let Diagnostic \"y\"\nmatch call()\n"),
        ],
    );

    assert_eq!(outcome.result.ok(), Some(DriverOutcome::Terminated));
    assert!(outcome.engine.diagnostics().is_empty());
}

#[rstest]
fn failures_report_script_and_line(tree: FakeTree) {
    let outcome = run(
        &tree,
        &[
            (
                "lint.nq",
                "# header\n\nlet Diagnostic \"found %0\"\n  set traversal sideways\nmatch call()\n",
            ),
            ("never.nq", "let Diagnostic \"y\"\nmatch call()\n"),
        ],
    );

    let err = outcome.result.expect_err("traversal literal is rejected");
    assert_eq!(err.script(), "lint.nq");
    assert_eq!(err.line(), 4);
    assert!(matches!(
        err,
        DriverError::QueryFailed {
            source: QueryError::UnknownTraversal { .. },
            ..
        }
    ));
    assert!(outcome.engine.diagnostics().is_empty());
    insta::assert_snapshot!(err.to_string(), @"query execution failed in lint.nq at line 4");
    insta::assert_snapshot!(outcome.output.trim_end(), @"expected traversal kind, got 'sideways'");
}

#[rstest]
fn invalid_commands_fail_at_their_own_line(tree: FakeTree) {
    let outcome = run(&tree, &[("typo.nq", "help\n\n\nmtach call()\nquit\n")]);

    let err = outcome.result.expect_err("unknown command");
    assert_eq!(err.line(), 4);
    assert!(outcome.output.starts_with("Available commands:"));
    assert!(outcome.output.ends_with("unknown command: mtach\n"));
}

#[rstest]
fn references_to_removed_names_fail_at_their_line(tree: FakeTree) {
    let outcome = run(
        &tree,
        &[("names.nq", "let x \"v\"\nlet y @x\nlet x\nlet z @x\n")],
    );

    let err = outcome.result.expect_err("x was removed");
    assert_eq!(err.line(), 4);
    insta::assert_snapshot!(outcome.output.trim_end(), @"unknown named value 'x'");
}

#[test]
fn empty_sets_complete_immediately() {
    let outcome = run(&FakeTree::default(), &[]);
    assert_eq!(outcome.result.ok(), Some(DriverOutcome::Completed));
}
