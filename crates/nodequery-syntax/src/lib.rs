//! Tree-sitter backed structural matching for nodequery scripts.
//!
//! This crate supplies the pattern engine that query scripts drive:
//!
//! - **Parsing** via [`Parser`], producing an error-tolerant [`ParseResult`]
//! - **Patterns** via [`Pattern`], written as ordinary source code with
//!   metavariables standing in for the parts to capture
//! - **Matching** via [`Matcher`], honouring the session's
//!   [`TraversalKind`](nodequery_core::TraversalKind)
//!
//! [`ParseResult`] implements [`nodequery_core::SyntaxTree`], so a parsed file
//! can be handed straight to a query session.
//!
//! # Pattern Language
//!
//! - `$VAR` - Matches any single node and binds it as `VAR`
//! - `$_` - Matches any single node without binding it
//! - `$$$VAR` - Matches zero or more sibling nodes and binds them as `VAR`
//!
//! Metavariable names start with an uppercase letter or underscore, so they
//! never collide with the lowercase `root` binding added by `set bind-root`.
//!
//! # Example
//!
//! ```ignore
//! use nodequery_syntax::{Matcher, Parser, Pattern, SupportedLanguage};
//!
//! let mut parser = Parser::new(SupportedLanguage::Rust)?;
//! let source = parser.parse("fn main() { helper(); }")?;
//! let pattern = Pattern::compile("$CALLEE()", SupportedLanguage::Rust)?;
//! for found in Matcher::new(&pattern).find_all(&source) {
//!     let _ = found.capture("CALLEE").map(|callee| callee.text());
//! }
//! ```

mod error;
mod language;
mod layout;
mod matcher;
mod metavariables;
mod parser;
mod pattern;
mod position;
mod tree;

pub use error::SyntaxError;
pub use language::{LanguageParseError, SupportedLanguage};
pub use matcher::{CapturedNode, CapturedNodes, CapturedValue, MatchResult, Matcher};
pub use parser::{ParseResult, Parser, SyntaxErrorInfo};
pub use pattern::{MetaVarKind, MetaVariable, Pattern};

#[cfg(test)]
mod tests;
