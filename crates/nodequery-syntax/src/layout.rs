//! Single-line rendering of captured source.

/// Joins the tokens under `nodes` with single spaces where the source had
/// layout between them.
///
/// `text` is the source spanned by `nodes`, starting at the first node.
/// String literals and comments are emitted verbatim, as is any gap between
/// tokens that holds more than whitespace.
pub(crate) fn single_line(text: &str, nodes: &[tree_sitter::Node<'_>]) -> String {
    let Some(base) = nodes.first().map(tree_sitter::Node::start_byte) else {
        return String::new();
    };
    let mut tokens = Vec::new();
    for node in nodes {
        collect_tokens(*node, &mut tokens);
    }

    let slice = |start: usize, end: usize| {
        text.get(start.saturating_sub(base)..end.saturating_sub(base))
            .unwrap_or_default()
    };
    let mut out = String::with_capacity(text.len());
    let mut emitted = base;
    for token in tokens {
        let gap = slice(emitted, token.start_byte());
        if gap.trim().is_empty() {
            if !gap.is_empty() {
                out.push(' ');
            }
        } else {
            out.push_str(gap);
        }
        out.push_str(slice(token.start_byte(), token.end_byte()));
        emitted = token.end_byte();
    }
    out
}

/// Collects the nodes rendered as a unit, in source order.
fn collect_tokens<'a>(node: tree_sitter::Node<'a>, tokens: &mut Vec<tree_sitter::Node<'a>>) {
    if node.child_count() == 0 || is_verbatim_kind(node.kind()) {
        if node.start_byte() < node.end_byte() {
            tokens.push(node);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_tokens(child, tokens);
    }
}

/// Literal and comment nodes whose inner spacing is part of their value.
fn is_verbatim_kind(kind: &str) -> bool {
    kind.contains("string") || kind.contains("comment") || kind == "char_literal"
}
