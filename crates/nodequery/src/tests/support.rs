//! A scripted [`SyntaxTree`] whose matches are fixed by each test.

use std::cell::Cell;
use std::collections::HashMap;

use nodequery_core::{
    Bindings, BoundNode, DiagnosticEngine, LineCol, PatternError, SourceRange, SyntaxTree,
    TraversalKind,
};

use crate::{Query, QueryError, QueryParser, QuerySession};

/// A pattern as the fake backend compiles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakePattern {
    pub(crate) text: String,
    pub(crate) root: Option<String>,
}

impl FakePattern {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            root: None,
        }
    }
}

/// A node with an optional location and fixed printed text.
#[derive(Debug, Clone)]
pub(crate) struct FakeNode {
    range: Option<SourceRange>,
    text: String,
}

impl BoundNode for FakeNode {
    fn source_range(&self) -> Option<SourceRange> {
        self.range
    }

    fn pretty_print(&self) -> String {
        self.text.clone()
    }
}

/// A node written in the source at zero-based `line`, `column`.
pub(crate) fn spelled(line: u32, column: u32, text: &str) -> FakeNode {
    let width = u32::try_from(text.len()).unwrap_or(u32::MAX);
    FakeNode {
        range: Some(SourceRange::new(
            0,
            text.len(),
            LineCol::new(line, column),
            LineCol::new(line, column + width),
        )),
        text: text.to_owned(),
    }
}

/// A node with no source location.
pub(crate) fn implicit(text: &str) -> FakeNode {
    FakeNode {
        range: None,
        text: text.to_owned(),
    }
}

/// One match: the root node plus named captures.
#[derive(Debug, Clone)]
pub(crate) struct FakeMatch {
    root: FakeNode,
    captures: Vec<(String, FakeNode)>,
}

impl FakeMatch {
    pub(crate) const fn at(root: FakeNode) -> Self {
        Self {
            root,
            captures: Vec::new(),
        }
    }

    pub(crate) fn capture(mut self, name: &str, node: FakeNode) -> Self {
        self.captures.push((name.to_owned(), node));
        self
    }
}

/// Patterns starting with `!` fail to compile and patterns starting with
/// `$$$` have no root; every other pattern yields the matches registered
/// for its text, or none.
#[derive(Debug, Default)]
pub(crate) struct FakeTree {
    matches: HashMap<String, Vec<FakeMatch>>,
    last_traversal: Cell<Option<TraversalKind>>,
}

impl FakeTree {
    pub(crate) fn with_matches(mut self, pattern: &str, matches: Vec<FakeMatch>) -> Self {
        self.matches.insert(pattern.to_owned(), matches);
        self
    }

    pub(crate) fn last_traversal(&self) -> Option<TraversalKind> {
        self.last_traversal.get()
    }
}

impl SyntaxTree for FakeTree {
    type Pattern = FakePattern;
    type Node<'t> = FakeNode;

    fn parse_pattern(&self, source: &str) -> Result<FakePattern, PatternError> {
        if source.starts_with('!') {
            return Err(PatternError::syntax(format!("cannot parse '{source}'")));
        }
        Ok(FakePattern::new(source))
    }

    fn try_bind_root(&self, pattern: &FakePattern, name: &str) -> Option<FakePattern> {
        (!pattern.text.starts_with("$$$")).then(|| FakePattern {
            text: pattern.text.clone(),
            root: Some(name.to_owned()),
        })
    }

    fn match_all(
        &self,
        pattern: &FakePattern,
        traversal: TraversalKind,
    ) -> Result<Vec<Bindings<FakeNode>>, PatternError> {
        self.last_traversal.set(Some(traversal));
        if pattern.text.starts_with("$$$") {
            return Err(PatternError::NotTopLevel);
        }

        let registered = self.matches.get(&pattern.text).cloned().unwrap_or_default();
        Ok(registered
            .into_iter()
            .map(|found| {
                let mut bindings: Bindings<FakeNode> = found.captures.into_iter().collect();
                if let Some(root) = &pattern.root {
                    bindings.bind(root.clone(), found.root);
                }
                bindings
            })
            .collect())
    }
}

/// What running a script through the parser and interpreter produced.
pub(crate) struct Outcome<'t> {
    pub(crate) session: QuerySession<'t, FakeTree>,
    pub(crate) output: String,
    pub(crate) engine: DiagnosticEngine,
    pub(crate) result: Result<(), QueryError>,
}

/// Parses and runs `script` until it ends, fails, or quits.
pub(crate) fn execute<'t>(tree: &'t FakeTree, script: &str) -> Outcome<'t> {
    let mut session = QuerySession::new(tree);
    let mut engine = DiagnosticEngine::new();
    let mut output = Vec::new();
    let mut remaining = script;
    let mut result = Ok(());

    while !remaining.is_empty() && !session.is_terminated() {
        let parsed = QueryParser::parse(remaining, &session);
        remaining = parsed.remaining;
        result = parsed.query.run(&mut session, &mut output, &mut engine);
        if result.is_err() {
            break;
        }
    }

    Outcome {
        session,
        output: String::from_utf8(output).expect("query output is UTF-8"),
        engine,
        result,
    }
}

/// Parses the first command of `text` against a fresh session.
pub(crate) fn parse_one(text: &str) -> Query<FakePattern> {
    let tree = FakeTree::default();
    let session = QuerySession::new(&tree);
    QueryParser::parse(text, &session).query
}
