//! State shared by the recursive matching functions.

use nodequery_core::TraversalKind;

use crate::pattern::Pattern;

pub(super) struct MatchContext<'a, 'p> {
    pub(super) pattern_root: tree_sitter::Node<'p>,
    pub(super) source: &'a str,
    pub(super) pattern: &'p Pattern,
    pub(super) traversal: TraversalKind,
}

impl<'a, 'p> MatchContext<'a, 'p> {
    pub(super) fn new(pattern: &'p Pattern, source: &'a str, traversal: TraversalKind) -> Self {
        Self {
            pattern_root: pattern.root_node(),
            source,
            pattern,
            traversal,
        }
    }

    pub(super) fn pattern_text(&self, node: tree_sitter::Node<'_>) -> &'p str {
        self.pattern
            .parsed()
            .source()
            .get(node.byte_range())
            .unwrap_or_default()
    }

    /// Returns whether `node` takes part in matching under the traversal
    /// mode. Nodes inserted by error recovery are not spelled in the source.
    pub(super) fn visits(&self, node: tree_sitter::Node<'_>) -> bool {
        match self.traversal {
            TraversalKind::AsIs => true,
            TraversalKind::IgnoreUnlessSpelledInSource => !node.is_missing(),
        }
    }

    /// Returns the children of `node` that take part in matching.
    pub(super) fn children<'n>(&self, node: tree_sitter::Node<'n>) -> Vec<tree_sitter::Node<'n>> {
        let mut cursor = node.walk();
        node.children(&mut cursor)
            .filter(|child| self.visits(*child))
            .collect()
    }
}
