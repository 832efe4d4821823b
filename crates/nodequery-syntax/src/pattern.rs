//! Compilation of structural patterns.
//!
//! A pattern is ordinary source code in the target language with
//! metavariables in place of the parts to capture:
//!
//! - `$VAR` matches any single node and captures it as `VAR`
//! - `$_` matches any single node without capturing
//! - `$$$VAR` matches zero or more sibling nodes and captures them as `VAR`
//!
//! Fragments that do not parse at the top level (statements, expressions
//! without a terminator) are retried inside a function body.

use tracing::trace;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::metavariables::{extract_metavar_name, placeholder_for_metavar};
use crate::parser::{ParseResult, Parser};

/// A compiled structural pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    metavariables: Vec<MetaVariable>,
    parsed: ParseResult,
    wrapped: bool,
    root_binding: Option<String>,
}

/// A metavariable occurring in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaVariable {
    /// The name without its `$` prefix.
    pub name: String,
    /// Whether it matches one node or a sequence.
    pub kind: MetaVarKind,
    /// Byte offset of the first `$` in the pattern text.
    pub offset: usize,
}

/// How many nodes a metavariable matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaVarKind {
    /// Exactly one node (`$VAR`).
    Single,
    /// Zero or more sibling nodes (`$$$VAR`).
    Multiple,
}

impl Pattern {
    /// Compiles `source` for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::InvalidMetavariable`] for malformed `$`
    /// sequences and [`SyntaxError::PatternCompileError`] when the pattern is
    /// empty or does not parse as code, even when wrapped in a function.
    pub fn compile(source: &str, language: SupportedLanguage) -> Result<Self, SyntaxError> {
        if source.trim().is_empty() {
            return Err(SyntaxError::pattern_compile(language, "pattern is empty"));
        }

        let (metavariables, normalised) = scan_metavariables(source)?;
        let mut parser = Parser::new(language)?;
        let mut parsed = parser.parse(&normalised)?;
        let mut wrapped = false;
        if parsed.has_errors() {
            trace!(pattern = source, "retrying pattern inside a function body");
            parsed = parser.parse(&language.wrap_fragment(&normalised))?;
            wrapped = true;
        }

        if parsed.has_errors() {
            return Err(SyntaxError::pattern_compile(language, "pattern contains syntax errors"));
        }

        Ok(Self {
            source: source.to_owned(),
            metavariables,
            parsed,
            wrapped,
            root_binding: None,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the metavariables in order of appearance.
    #[must_use]
    pub fn metavariables(&self) -> &[MetaVariable] {
        &self.metavariables
    }

    /// Returns the name the matched root node is bound under, if any.
    #[must_use]
    pub fn root_binding(&self) -> Option<&str> {
        self.root_binding.as_deref()
    }

    /// Returns a copy that also binds each matched root node as `name`.
    ///
    /// Returns `None` when the pattern has no single root node to bind,
    /// which is the case for a bare `$$$VAR`.
    #[must_use]
    pub fn bind_root(&self, name: &str) -> Option<Self> {
        if !self.is_anchored() {
            return None;
        }
        let mut bound = self.clone();
        bound.root_binding = Some(name.to_owned());
        Some(bound)
    }

    pub(crate) const fn parsed(&self) -> &ParseResult {
        &self.parsed
    }

    /// Returns the node that a match is anchored on.
    ///
    /// For wrapped fragments this is the single statement in the wrapper's
    /// body, or the body itself when the fragment spans several statements.
    pub(crate) fn root_node(&self) -> tree_sitter::Node<'_> {
        let root = self.parsed.root_node();
        let top = root.named_child(0).unwrap_or(root);
        let statement = if self.wrapped {
            wrapped_statement(top)
        } else {
            top
        };

        // An unterminated expression matches the expression wherever it
        // occurs, not only in statement position.
        if statement.kind() == "expression_statement"
            && statement.named_child_count() == 1
            && !self.source.trim_end().ends_with(';')
        {
            return statement.named_child(0).unwrap_or(statement);
        }
        statement
    }
}

fn wrapped_statement(wrapper: tree_sitter::Node<'_>) -> tree_sitter::Node<'_> {
    let Some(body) = wrapper.child_by_field_name("body") else {
        return wrapper;
    };
    let mut cursor = body.walk();
    let statements: Vec<_> = body.named_children(&mut cursor).collect();
    match statements.as_slice() {
        [statement] => *statement,
        _ => body,
    }
}

/// Finds every metavariable in `source` and replaces each with a placeholder
/// identifier the grammar accepts.
fn scan_metavariables(source: &str) -> Result<(Vec<MetaVariable>, String), SyntaxError> {
    let mut metavariables = Vec::new();
    let mut normalised = String::with_capacity(source.len());
    let mut chars = source.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        if ch != '$' {
            normalised.push(ch);
            continue;
        }

        let mut dollars = 1;
        while chars.peek().is_some_and(|(_, c)| *c == '$') {
            chars.next();
            dollars += 1;
        }
        let kind = match dollars {
            1 => MetaVarKind::Single,
            3 => MetaVarKind::Multiple,
            _ => {
                return Err(SyntaxError::invalid_metavariable(format!(
                    "metavariable at offset {offset} has invalid '$' prefix length ({dollars})"
                )));
            }
        };

        let name = extract_metavar_name(&mut chars);
        if name.is_empty() {
            return Err(SyntaxError::invalid_metavariable(format!(
                "metavariable at offset {offset} has no valid name"
            )));
        }

        normalised.push_str(&placeholder_for_metavar(&name));
        metavariables.push(MetaVariable { name, kind, offset });
    }

    Ok((metavariables, normalised))
}
