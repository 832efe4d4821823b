//! Conversions from Tree-sitter positions to query locations.
//!
//! Tree-sitter positions are zero-based. Syntax error reports use one-based
//! coordinates; diagnostics carry the zero-based [`LineCol`] and convert at
//! render time.

use nodequery_core::{LineCol, SourceRange};

/// Converts a Tree-sitter position (0-based) to one-based display coordinates.
#[must_use]
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    point_to_line_col(pos).one_based()
}

/// Converts a Tree-sitter position to a zero-based [`LineCol`].
#[must_use]
pub(crate) fn point_to_line_col(pos: tree_sitter::Point) -> LineCol {
    // Line/column numbers will realistically never exceed u32::MAX.
    let line = u32::try_from(pos.row).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column).unwrap_or(u32::MAX);
    LineCol::new(line, column)
}

/// Returns the range a node occupies in its source.
#[must_use]
pub(crate) fn node_range(node: tree_sitter::Node<'_>) -> SourceRange {
    span_range(node, node)
}

/// Returns the range from the start of `first` to the end of `last`.
#[must_use]
pub(crate) fn span_range(first: tree_sitter::Node<'_>, last: tree_sitter::Node<'_>) -> SourceRange {
    SourceRange::new(
        first.start_byte(),
        last.end_byte(),
        point_to_line_col(first.start_position()),
        point_to_line_col(last.end_position()),
    )
}
