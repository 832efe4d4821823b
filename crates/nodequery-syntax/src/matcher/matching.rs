//! Recursive matching of pattern trees against source trees.

use crate::matcher::MatchResult;
use crate::matcher::capture::Captures;
use crate::matcher::context::MatchContext;
use crate::metavariables::metavar_name_from_placeholder;
use crate::parser::ParseResult;
use crate::pattern::{MetaVarKind, MetaVariable};

/// Block nodes stand for themselves even when they hold a single statement.
fn is_block_node_kind(kind: &str) -> bool {
    matches!(kind, "block" | "statement_block" | "compound_statement")
}

/// Collects every match in pre-order.
pub(super) fn find_all<'a>(
    ctx: &MatchContext<'a, '_>,
    parsed: &'a ParseResult,
) -> Vec<MatchResult<'a>> {
    let mut results = Vec::new();
    visit(parsed.root_node(), ctx, &mut results);
    results
}

/// Returns the metavariable standing for the whole pattern, if there is one.
pub(super) fn root_metavariable<'p>(ctx: &MatchContext<'_, 'p>) -> Option<&'p MetaVariable> {
    find_metavariable_in_pattern(ctx.pattern_root, ctx)
}

/// Walks the source tree in pre-order, collecting each match.
fn visit<'a>(
    source_node: tree_sitter::Node<'a>,
    ctx: &MatchContext<'a, '_>,
    results: &mut Vec<MatchResult<'a>>,
) {
    if !ctx.visits(source_node) {
        return;
    }

    let mut captures = Captures::new(ctx.source);
    if nodes_match(source_node, ctx.pattern_root, ctx, &mut captures) {
        if let Some(name) = ctx.pattern.root_binding() {
            captures.bind_root(name, source_node);
        }
        results.push(MatchResult {
            captures: captures.into_inner(),
        });
    }

    let mut cursor = source_node.walk();
    for child in source_node.children(&mut cursor) {
        visit(child, ctx, results);
    }
}

/// Resolves a pattern node to a metavariable, looking through wrapper nodes
/// whose only child is the placeholder.
fn find_metavariable_in_pattern<'p>(
    pattern_node: tree_sitter::Node<'p>,
    ctx: &MatchContext<'_, 'p>,
) -> Option<&'p MetaVariable> {
    if let Some(name) = metavar_name_from_placeholder(ctx.pattern_text(pattern_node)) {
        return ctx.pattern.metavariables().iter().find(|m| m.name == name);
    }

    if pattern_node.is_error()
        || is_block_node_kind(pattern_node.kind())
        || pattern_node.child_count() != 1
    {
        return None;
    }
    find_metavariable_in_pattern(pattern_node.child(0)?, ctx)
}

fn nodes_match<'a>(
    source_node: tree_sitter::Node<'a>,
    pattern_node: tree_sitter::Node<'_>,
    ctx: &MatchContext<'a, '_>,
    captures: &mut Captures<'a>,
) -> bool {
    if let Some(metavar) = find_metavariable_in_pattern(pattern_node, ctx) {
        return match metavar.kind {
            MetaVarKind::Single => captures.capture_single(&metavar.name, source_node),
            MetaVarKind::Multiple => captures.capture_multiple(&metavar.name, &[source_node]),
        };
    }

    if source_node.kind() != pattern_node.kind() {
        return false;
    }

    if pattern_node.child_count() == 0 {
        let source_text = ctx.source.get(source_node.byte_range()).unwrap_or_default();
        return source_text == ctx.pattern_text(pattern_node);
    }

    match_children(source_node, pattern_node, ctx, captures)
}

fn match_children<'a>(
    source_node: tree_sitter::Node<'a>,
    pattern_node: tree_sitter::Node<'_>,
    ctx: &MatchContext<'a, '_>,
    captures: &mut Captures<'a>,
) -> bool {
    let source_children = ctx.children(source_node);
    let pattern_children = ctx.children(pattern_node);

    let has_sequence = pattern_children.iter().any(|child| {
        find_metavariable_in_pattern(*child, ctx)
            .is_some_and(|metavar| metavar.kind == MetaVarKind::Multiple)
    });

    if has_sequence {
        return SequenceMatcher {
            source_children: &source_children,
            pattern_children: &pattern_children,
            ctx,
        }
        .matches(0, 0, captures);
    }

    source_children.len() == pattern_children.len()
        && source_children
            .iter()
            .zip(&pattern_children)
            .all(|(source_child, pattern_child)| {
                nodes_match(*source_child, *pattern_child, ctx, captures)
            })
}

/// Backtracking matcher for child lists containing `$$$VAR`.
struct SequenceMatcher<'a, 'p, 'c> {
    source_children: &'c [tree_sitter::Node<'a>],
    pattern_children: &'c [tree_sitter::Node<'p>],
    ctx: &'c MatchContext<'a, 'p>,
}

impl<'a> SequenceMatcher<'a, '_, '_> {
    fn matches(&self, source_idx: usize, pattern_idx: usize, captures: &mut Captures<'a>) -> bool {
        let Some(pattern_child) = self.pattern_children.get(pattern_idx).copied() else {
            return source_idx == self.source_children.len();
        };

        let sequence = find_metavariable_in_pattern(pattern_child, self.ctx)
            .filter(|metavar| metavar.kind == MetaVarKind::Multiple);
        if let Some(metavar) = sequence {
            return self.matches_sequence(source_idx, pattern_idx, metavar, captures);
        }

        let Some(source_child) = self.source_children.get(source_idx).copied() else {
            return false;
        };
        let mut trial = captures.clone();
        if nodes_match(source_child, pattern_child, self.ctx, &mut trial)
            && self.matches(source_idx + 1, pattern_idx + 1, &mut trial)
        {
            *captures = trial;
            return true;
        }
        false
    }

    /// Tries every length for the sequence capture, shortest first.
    fn matches_sequence(
        &self,
        source_idx: usize,
        pattern_idx: usize,
        metavar: &MetaVariable,
        captures: &mut Captures<'a>,
    ) -> bool {
        for end in source_idx..=self.source_children.len() {
            let Some(candidate) = self.source_children.get(source_idx..end) else {
                continue;
            };

            let mut trial = captures.clone();
            if trial.capture_multiple(&metavar.name, candidate)
                && self.matches(end, pattern_idx + 1, &mut trial)
            {
                *captures = trial;
                return true;
            }
        }
        false
    }
}
