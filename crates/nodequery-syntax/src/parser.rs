//! Error-tolerant parsing of query targets.

use std::ops::Range;

use tracing::debug;

use crate::error::SyntaxError;
use crate::language::SupportedLanguage;
use crate::position::point_to_one_based;

/// A parsed source file.
///
/// Tree-sitter always produces a tree, so a result may contain ERROR and
/// MISSING nodes alongside valid structure.
#[derive(Debug, Clone)]
pub struct ParseResult {
    tree: tree_sitter::Tree,
    source: String,
    language: SupportedLanguage,
}

impl ParseResult {
    /// Returns the parsed text.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the language the text was parsed as.
    #[must_use]
    pub const fn language(&self) -> SupportedLanguage {
        self.language
    }

    /// Returns the root node of the tree.
    #[must_use]
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// Returns whether the tree holds any ERROR or MISSING node.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Collects every ERROR and MISSING node in document order.
    #[must_use]
    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        collect_error_nodes(self.tree.root_node(), &self.source, &mut errors);
        errors
    }
}

/// A syntax error found while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    /// Byte range of the error in the source.
    pub byte_range: Range<usize>,
    /// One-based line where the error starts.
    pub line: u32,
    /// One-based column where the error starts.
    pub column: u32,
    /// The offending text, shortened to a single line.
    pub context: String,
    /// Human-readable description.
    pub message: String,
}

const CONTEXT_LIMIT: usize = 40;

impl SyntaxErrorInfo {
    fn from_node(node: tree_sitter::Node<'_>, source: &str) -> Self {
        let byte_range = node.byte_range();
        let snippet = source
            .get(byte_range.clone())
            .and_then(|text| text.lines().next())
            .unwrap_or_default();
        let context = if snippet.chars().count() > CONTEXT_LIMIT {
            let head: String = snippet.chars().take(CONTEXT_LIMIT).collect();
            format!("{head}...")
        } else {
            snippet.to_owned()
        };

        let message = if node.is_missing() {
            format!("missing {}", node.kind())
        } else {
            "syntax error".to_owned()
        };

        let (line, column) = point_to_one_based(node.start_position());
        Self {
            byte_range,
            line,
            column,
            context,
            message,
        }
    }
}

/// A Tree-sitter parser bound to one language.
pub struct Parser {
    inner: tree_sitter::Parser,
    language: SupportedLanguage,
}

impl Parser {
    /// Creates a parser for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParserInitError`] when the grammar is
    /// incompatible with the linked Tree-sitter runtime.
    pub fn new(language: SupportedLanguage) -> Result<Self, SyntaxError> {
        let mut inner = tree_sitter::Parser::new();
        inner
            .set_language(&language.grammar())
            .map_err(|e| SyntaxError::parser_init(language, e.to_string()))?;
        Ok(Self { inner, language })
    }

    /// Parses `source` into a tree.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::ParseError`] if Tree-sitter gives up without
    /// producing a tree.
    pub fn parse(&mut self, source: &str) -> Result<ParseResult, SyntaxError> {
        let tree = self
            .inner
            .parse(source, None)
            .ok_or_else(|| SyntaxError::parse(self.language, "parser produced no tree"))?;
        debug!(
            language = %self.language,
            bytes = source.len(),
            has_errors = tree.root_node().has_error(),
            "parsed source"
        );
        Ok(ParseResult {
            tree,
            source: source.to_owned(),
            language: self.language,
        })
    }
}

fn collect_error_nodes(
    node: tree_sitter::Node<'_>,
    source: &str,
    errors: &mut Vec<SyntaxErrorInfo>,
) {
    if node.is_error() || node.is_missing() {
        errors.push(SyntaxErrorInfo::from_node(node, source));
    }
    if !node.has_error() {
        return;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, source, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SupportedLanguage::Rust, "fn main() {}")]
    #[case(SupportedLanguage::Python, "def main():\n    pass\n")]
    #[case(SupportedLanguage::TypeScript, "function main(): void {}")]
    fn valid_sources_parse_cleanly(#[case] language: SupportedLanguage, #[case] source: &str) {
        let mut parser = Parser::new(language).expect("parser init");
        let parsed = parser.parse(source).expect("parse");

        assert!(!parsed.has_errors());
        assert!(parsed.errors().is_empty());
        assert_eq!(parsed.language(), language);
    }

    #[test]
    fn broken_source_reports_one_based_positions() {
        let mut parser = Parser::new(SupportedLanguage::Rust).expect("parser init");
        let parsed = parser.parse("fn ok() {}\nfn broken( {").expect("parse");

        let errors = parsed.errors();
        let first = errors.first().expect("an error is reported");
        assert!(parsed.has_errors());
        assert_eq!(first.line, 2);
        assert!(first.column >= 1);
    }
}
