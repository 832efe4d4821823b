//! The `SyntaxTree` implementation seen from a query session.

use nodequery_core::{BoundNode, LineCol, PatternError, SyntaxTree, TraversalKind};
use rstest::{fixture, rstest};

use crate::{ParseResult, Parser, SupportedLanguage};

fn parse(source: &str) -> ParseResult {
    Parser::new(SupportedLanguage::Rust)
        .expect("parser init")
        .parse(source)
        .expect("parse")
}

#[fixture]
fn three_functions() -> ParseResult {
    parse("fn a() {}\nfn b() {}\nfn c() {}\n")
}

#[rstest]
fn bindings_expose_ranges_and_text(three_functions: ParseResult) {
    let unbound = three_functions
        .parse_pattern("fn $NAME() {}")
        .expect("pattern");
    let pattern = three_functions
        .try_bind_root(&unbound, "root")
        .expect("anchored");

    let matches = three_functions
        .match_all(&pattern, TraversalKind::AsIs)
        .expect("match");
    assert_eq!(matches.len(), 3);

    let second = matches.get(1).expect("second match");
    let root = second.get("root").expect("root bound");
    let range = root.source_range().expect("spelled in source");
    assert_eq!(range.start(), LineCol::new(1, 0));
    assert_eq!(root.pretty_print(), "fn b() {}");
    assert_eq!(
        second.get("NAME").map(BoundNode::pretty_print).as_deref(),
        Some("b")
    );
}

#[test]
fn pretty_print_collapses_layout() {
    let tree = parse("fn main() {\n    call(\n        1,\n        2,\n    );\n}\n");
    let unbound = tree.parse_pattern("call($$$ARGS)").expect("pattern");
    let pattern = tree.try_bind_root(&unbound, "root").expect("anchored");

    let matches = tree
        .match_all(&pattern, TraversalKind::AsIs)
        .expect("match");
    let root = matches
        .first()
        .and_then(|m| m.get("root"))
        .expect("root bound");
    assert_eq!(root.pretty_print(), "call( 1, 2, )");
}

#[test]
fn pretty_print_keeps_string_literal_spacing() {
    let tree = parse("fn main() { f(\"ü  x\",\n    g); }\n");
    let pattern = tree.parse_pattern("f($$$ARGS)").expect("pattern");

    let matches = tree
        .match_all(&pattern, TraversalKind::AsIs)
        .expect("match");
    let args = matches
        .first()
        .and_then(|m| m.get("ARGS"))
        .expect("ARGS bound");
    assert_eq!(args.pretty_print(), "\"ü  x\", g");
}

#[rstest]
fn bare_sequences_are_not_top_level(three_functions: ParseResult) {
    let pattern = three_functions.parse_pattern("$$$ITEMS").expect("pattern");

    assert!(three_functions.try_bind_root(&pattern, "root").is_none());
    assert_eq!(
        three_functions
            .match_all(&pattern, TraversalKind::AsIs)
            .map(|matches| matches.len()),
        Err(PatternError::NotTopLevel)
    );
}

#[rstest]
fn invalid_patterns_report_a_message(three_functions: ParseResult) {
    let err = three_functions.parse_pattern("fn (").expect_err("invalid");
    assert_eq!(
        err,
        PatternError::syntax("invalid pattern for rust: pattern contains syntax errors")
    );
}

#[test]
fn ignoring_implicit_nodes_skips_recovered_tokens() {
    let tree = parse("fn main() { let x = 1 }\n");
    let pattern = tree.parse_pattern("$NODE").expect("pattern");

    let as_is = tree
        .match_all(&pattern, TraversalKind::AsIs)
        .expect("match");
    let spelled = tree
        .match_all(&pattern, TraversalKind::IgnoreUnlessSpelledInSource)
        .expect("match");
    let missing = tree
        .errors()
        .iter()
        .filter(|error| error.message.starts_with("missing"))
        .count();

    assert_eq!(as_is.len(), spelled.len() + missing);
    assert!(
        spelled
            .iter()
            .filter_map(|bindings| bindings.get("NODE"))
            .all(|node| node.source_range().is_some())
    );
}
