//! Metavariable name rules shared by pattern compilation and matching.
//!
//! Patterns spell metavariables as `$NAME` and `$$$NAME`. Before parsing, each
//! one is replaced by a placeholder identifier the grammar accepts; matching
//! maps placeholders back to names.

pub(crate) const METAVAR_PLACEHOLDER_PREFIX: &str = "__NODEQUERY_METAVAR_";
pub(crate) const METAVAR_PLACEHOLDER_SUFFIX: &str = "__";

/// Returns whether `c` may start a metavariable name.
#[must_use]
pub(crate) const fn is_valid_metavar_start_char(c: char) -> bool {
    c.is_ascii_uppercase() || c == '_'
}

/// Returns whether `c` may continue a metavariable name.
#[must_use]
pub(crate) const fn is_valid_metavar_continuation_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'
}

/// Reads a metavariable name from a stream positioned just after the `$`
/// prefix. Returns an empty string if no valid name starts there.
pub(crate) fn extract_metavar_name(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) -> String {
    let mut name = String::new();

    let Some((_, first_char)) = chars.peek().copied() else {
        return name;
    };

    if !is_valid_metavar_start_char(first_char) {
        return name;
    }

    name.push(first_char);
    chars.next();

    while let Some((_, c)) = chars.peek().copied() {
        if !is_valid_metavar_continuation_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }

    name
}

#[must_use]
pub(crate) fn placeholder_for_metavar(name: &str) -> String {
    format!("{METAVAR_PLACEHOLDER_PREFIX}{name}{METAVAR_PLACEHOLDER_SUFFIX}")
}

#[must_use]
pub(crate) fn metavar_name_from_placeholder(text: &str) -> Option<&str> {
    text.strip_prefix(METAVAR_PLACEHOLDER_PREFIX)
        .and_then(|rest| rest.strip_suffix(METAVAR_PLACEHOLDER_SUFFIX))
}
