//! The seam between the query language and a structural matching engine.
//!
//! The query interpreter never inspects patterns or nodes directly. It asks a
//! [`SyntaxTree`] to compile pattern text, to bind a pattern's root under a
//! name, and to enumerate matches; each match is a set of [`Bindings`] whose
//! nodes expose a source range and a printable form through [`BoundNode`].

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use crate::options::TraversalKind;
use crate::span::SourceRange;

/// Errors reported by a pattern backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// The pattern text could not be compiled.
    #[error("{message}")]
    Syntax {
        /// Description of the compilation failure.
        message: String,
    },
    /// The pattern cannot anchor a match at a single tree node.
    #[error("Not a valid top-level matcher.")]
    NotTopLevel,
}

impl PatternError {
    /// Creates a pattern syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }
}

/// A tree node captured by a match.
pub trait BoundNode {
    /// Returns the node's range in the source, or `None` when the node was
    /// not spelled in the source and has no valid location.
    fn source_range(&self) -> Option<SourceRange>;

    /// Returns the node rendered as text for diagnostic arguments.
    fn pretty_print(&self) -> String;
}

/// The names bound by one successful match, mapped to their nodes.
#[derive(Debug, Clone)]
pub struct Bindings<N> {
    nodes: HashMap<String, N>,
}

impl<N> Bindings<N> {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Binds `node` under `name`, replacing any earlier binding.
    pub fn bind(&mut self, name: impl Into<String>, node: N) {
        self.nodes.insert(name.into(), node);
    }

    /// Returns the node bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&N> {
        self.nodes.get(name)
    }
}

impl<N> Default for Bindings<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> From<HashMap<String, N>> for Bindings<N> {
    fn from(nodes: HashMap<String, N>) -> Self {
        Self { nodes }
    }
}

impl<N> FromIterator<(String, N)> for Bindings<N> {
    fn from_iter<I: IntoIterator<Item = (String, N)>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// A parsed syntax tree that can compile and evaluate structural patterns.
///
/// Implementations own the pattern grammar; the query language only delimits
/// pattern text and hands it over unchanged.
pub trait SyntaxTree {
    /// A compiled pattern expression.
    type Pattern: Clone + fmt::Debug;

    /// A node bound by a match, borrowing from the tree.
    type Node<'t>: BoundNode
    where
        Self: 't;

    /// Compiles pattern text for this tree's language.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::Syntax`] when the text is not a valid pattern.
    fn parse_pattern(&self, source: &str) -> Result<Self::Pattern, PatternError>;

    /// Returns a copy of `pattern` whose matched root node is also bound
    /// under `name`, or `None` when the pattern cannot be rebound.
    fn try_bind_root(&self, pattern: &Self::Pattern, name: &str) -> Option<Self::Pattern>;

    /// Evaluates `pattern` over the whole tree, returning every match in the
    /// order the engine visits them.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError::NotTopLevel`] when the pattern cannot anchor
    /// a match at a node.
    fn match_all(
        &self,
        pattern: &Self::Pattern,
        traversal: TraversalKind,
    ) -> Result<Vec<Bindings<Self::Node<'_>>>, PatternError>;
}
