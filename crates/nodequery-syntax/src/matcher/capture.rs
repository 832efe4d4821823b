//! Values bound to metavariables by a match.

use std::collections::HashMap;

use nodequery_core::SourceRange;

use crate::layout::single_line;
use crate::position::{node_range, span_range};

/// One captured node.
#[derive(Debug, Clone)]
pub struct CapturedNode<'a> {
    node: tree_sitter::Node<'a>,
    text: &'a str,
}

impl<'a> CapturedNode<'a> {
    fn new(node: tree_sitter::Node<'a>, source: &'a str) -> Self {
        let text = source.get(node.byte_range()).unwrap_or_default();
        Self { node, text }
    }

    /// Returns the node's source text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the node's range, or `None` for a node the parser inserted
    /// during error recovery.
    #[must_use]
    pub fn range(&self) -> Option<SourceRange> {
        (!self.node.is_missing()).then(|| node_range(self.node))
    }

    fn same_as(&self, other: &Self) -> bool {
        self.node.kind() == other.node.kind() && self.text == other.text
    }
}

/// The sibling nodes captured by a `$$$NAME` metavariable.
#[derive(Debug, Clone)]
pub struct CapturedNodes<'a> {
    nodes: Vec<CapturedNode<'a>>,
    text: &'a str,
}

impl<'a> CapturedNodes<'a> {
    /// Returns the source text spanning the first to the last node. Empty
    /// captures have empty text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Returns the spanned range, or `None` for an empty capture.
    #[must_use]
    pub fn range(&self) -> Option<SourceRange> {
        let first = self.nodes.first()?;
        let last = self.nodes.last()?;
        Some(span_range(first.node, last.node))
    }
}

/// A metavariable's captured value.
#[derive(Debug, Clone)]
pub enum CapturedValue<'a> {
    /// A single-node capture (`$NAME`).
    Single(CapturedNode<'a>),
    /// A sequence capture (`$$$NAME`).
    Multiple(CapturedNodes<'a>),
}

impl<'a> CapturedValue<'a> {
    /// Returns the captured text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        match self {
            Self::Single(node) => node.text(),
            Self::Multiple(nodes) => nodes.text(),
        }
    }

    /// Returns the captured range when the capture has a location.
    #[must_use]
    pub fn range(&self) -> Option<SourceRange> {
        match self {
            Self::Single(node) => node.range(),
            Self::Multiple(nodes) => nodes.range(),
        }
    }

    /// Returns the captured text on one line, with the layout between
    /// tokens collapsed to single spaces.
    #[must_use]
    pub(crate) fn single_line_text(&self) -> String {
        match self {
            Self::Single(node) => single_line(node.text, &[node.node]),
            Self::Multiple(nodes) => {
                let syntax: Vec<_> = nodes.nodes.iter().map(|node| node.node).collect();
                single_line(nodes.text, &syntax)
            }
        }
    }

    fn same_text(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Single(a), Self::Single(b)) => a.same_as(b),
            (Self::Multiple(a), Self::Multiple(b)) => {
                a.nodes.len() == b.nodes.len()
                    && a.nodes
                        .iter()
                        .zip(&b.nodes)
                        .all(|(left, right)| left.same_as(right))
            }
            _ => false,
        }
    }
}

/// Capture state for one candidate match.
///
/// A metavariable used twice must capture equal text both times.
#[derive(Debug, Clone)]
pub(super) struct Captures<'a> {
    source: &'a str,
    inner: HashMap<String, CapturedValue<'a>>,
}

impl<'a> Captures<'a> {
    pub(super) fn new(source: &'a str) -> Self {
        Self {
            source,
            inner: HashMap::new(),
        }
    }

    pub(super) fn into_inner(self) -> HashMap<String, CapturedValue<'a>> {
        self.inner
    }

    pub(super) fn capture_single(&mut self, name: &str, node: tree_sitter::Node<'a>) -> bool {
        if name == "_" {
            return true;
        }
        let value = CapturedValue::Single(CapturedNode::new(node, self.source));
        self.insert_consistent(name, value)
    }

    pub(super) fn capture_multiple(&mut self, name: &str, nodes: &[tree_sitter::Node<'a>]) -> bool {
        if name == "_" {
            return true;
        }

        let text = match (nodes.first(), nodes.last()) {
            (Some(first), Some(last)) => self
                .source
                .get(first.start_byte()..last.end_byte())
                .unwrap_or_default(),
            _ => "",
        };
        let value = CapturedValue::Multiple(CapturedNodes {
            nodes: nodes
                .iter()
                .map(|node| CapturedNode::new(*node, self.source))
                .collect(),
            text,
        });
        self.insert_consistent(name, value)
    }

    /// Binds the matched root node, replacing any capture of the same name.
    pub(super) fn bind_root(&mut self, name: &str, node: tree_sitter::Node<'a>) {
        let value = CapturedValue::Single(CapturedNode::new(node, self.source));
        self.inner.insert(name.to_owned(), value);
    }

    fn insert_consistent(&mut self, name: &str, next: CapturedValue<'a>) -> bool {
        match self.inner.get(name) {
            Some(existing) => existing.same_text(&next),
            None => {
                self.inner.insert(name.to_owned(), next);
                true
            }
        }
    }
}
