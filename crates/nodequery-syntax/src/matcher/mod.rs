//! Structural matching of compiled patterns against parsed sources.
//!
//! The matcher walks the source tree in pre-order and tests every node
//! against the pattern's root, so nested matches are reported after their
//! enclosing match.

mod capture;
mod context;
mod matching;

use std::collections::HashMap;

use nodequery_core::TraversalKind;

use crate::parser::ParseResult;
use crate::pattern::{MetaVarKind, Pattern};

pub use capture::{CapturedNode, CapturedNodes, CapturedValue};

use context::MatchContext;

/// One successful match.
#[derive(Debug)]
pub struct MatchResult<'a> {
    captures: HashMap<String, CapturedValue<'a>>,
}

impl<'a> MatchResult<'a> {
    /// Returns the capture bound to `name`.
    #[must_use]
    pub fn capture(&self, name: &str) -> Option<&CapturedValue<'a>> {
        self.captures.get(name)
    }

    /// Consumes the match, returning its captures.
    #[must_use]
    pub fn into_captures(self) -> HashMap<String, CapturedValue<'a>> {
        self.captures
    }
}

/// Finds occurrences of a pattern in parsed sources.
pub struct Matcher<'p> {
    pattern: &'p Pattern,
    traversal: TraversalKind,
}

impl<'p> Matcher<'p> {
    /// Creates a matcher that visits every node.
    #[must_use]
    pub const fn new(pattern: &'p Pattern) -> Self {
        Self {
            pattern,
            traversal: TraversalKind::AsIs,
        }
    }

    /// Sets which nodes the matcher visits.
    #[must_use]
    pub const fn with_traversal(mut self, traversal: TraversalKind) -> Self {
        self.traversal = traversal;
        self
    }

    /// Returns whether matches anchor on a single node.
    ///
    /// A pattern that is only a `$$$VAR` sequence has no such node.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        let ctx = MatchContext::new(self.pattern, "", self.traversal);
        matching::root_metavariable(&ctx).is_none_or(|metavar| metavar.kind == MetaVarKind::Single)
    }

    /// Finds every match in pre-order.
    #[must_use]
    pub fn find_all<'a>(&self, parsed: &'a ParseResult) -> Vec<MatchResult<'a>> {
        let ctx = MatchContext::new(self.pattern, parsed.source(), self.traversal);
        matching::find_all(&ctx, parsed)
    }
}

impl Pattern {
    /// Returns whether matches anchor on a single node.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        Matcher::new(self).is_anchored()
    }
}
