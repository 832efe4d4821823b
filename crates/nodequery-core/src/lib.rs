//! Core data model shared by the nodequery crates.
//!
//! This crate defines the vocabulary that the query language, the pattern
//! backends, and the command-line host agree on:
//!
//! - [`Value`] and [`NamedValues`]: the typed value store of a session
//! - [`TraversalKind`], [`OutputFeature`] and [`OutputFeatures`]: session
//!   options set from scripts
//! - [`LineCol`] and [`SourceRange`]: zero-based source positions
//! - [`SyntaxTree`], [`BoundNode`] and [`Bindings`]: the seam to a
//!   structural pattern-matching engine
//! - [`DiagnosticSink`], [`DiagnosticEngine`] and [`Diagnostic`]: templated,
//!   severity-tagged diagnostics anchored to source ranges
//!
//! # Example
//!
//! ```
//! use nodequery_core::{DiagnosticEngine, DiagnosticSink, LineCol, Severity};
//!
//! let mut engine = DiagnosticEngine::new();
//! let id = engine.register_template(Severity::Warning, "avoid %0");
//! engine.report(id, LineCol::new(0, 0)).arg("unsafe").emit();
//! assert_eq!(engine.diagnostics()[0].message(), "avoid unsafe");
//! ```

mod diagnostic;
mod options;
mod span;
mod tree;
mod value;

pub use diagnostic::{
    Diagnostic, DiagnosticBuilder, DiagnosticEngine, DiagnosticSink, DiagnosticTemplate,
    Severity, TemplateId, format_message,
};
pub use options::{OutputFeature, OutputFeatureParseError, OutputFeatures, TraversalKind};
pub use span::{LineCol, SourceRange};
pub use tree::{Bindings, BoundNode, PatternError, SyntaxTree};
pub use value::{NamedValues, Value};

#[cfg(test)]
mod tests;
