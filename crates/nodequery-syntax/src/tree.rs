//! Query-session integration for parsed sources.

use nodequery_core::{Bindings, BoundNode, PatternError, SourceRange, SyntaxTree, TraversalKind};
use tracing::debug;

use crate::matcher::{CapturedValue, Matcher};
use crate::parser::ParseResult;
use crate::pattern::Pattern;

impl BoundNode for CapturedValue<'_> {
    fn source_range(&self) -> Option<SourceRange> {
        self.range()
    }

    fn pretty_print(&self) -> String {
        self.single_line_text()
    }
}

impl SyntaxTree for ParseResult {
    type Pattern = Pattern;
    type Node<'t> = CapturedValue<'t>;

    fn parse_pattern(&self, source: &str) -> Result<Pattern, PatternError> {
        Pattern::compile(source, self.language())
            .map_err(|err| PatternError::syntax(err.to_string()))
    }

    fn try_bind_root(&self, pattern: &Pattern, name: &str) -> Option<Pattern> {
        pattern.bind_root(name)
    }

    fn match_all(
        &self,
        pattern: &Pattern,
        traversal: TraversalKind,
    ) -> Result<Vec<Bindings<CapturedValue<'_>>>, PatternError> {
        let matcher = Matcher::new(pattern).with_traversal(traversal);
        if !matcher.is_anchored() {
            return Err(PatternError::NotTopLevel);
        }

        let matches = matcher.find_all(self);
        debug!(
            pattern = pattern.source(),
            count = matches.len(),
            "evaluated pattern"
        );
        Ok(matches
            .into_iter()
            .map(|found| Bindings::from(found.into_captures()))
            .collect())
    }
}
