//! A line-oriented query language for structural searches over syntax trees.
//!
//! Scripts are sequences of commands such as:
//!
//! ```text
//! let Diagnostic "call to %0"
//! let DiagnosticArgs "CALLEE"
//! match $CALLEE($$$ARGS)
//! ```
//!
//! [`QueryParser`] turns script text into [`Query`] values one command at a
//! time, [`Query::run`] executes a command against a [`QuerySession`], and
//! [`ScriptDriver`] runs whole [`ScriptSet`]s with a fresh session per
//! script. Pattern text is opaque here: it is compiled and evaluated by the
//! [`SyntaxTree`](nodequery_core::SyntaxTree) the session borrows, and matches
//! are reported through a [`DiagnosticSink`](nodequery_core::DiagnosticSink).

mod driver;
mod help;
mod interpreter;
mod lexer;
mod parser;
mod query;
mod session;

pub use driver::{DriverError, DriverOutcome, Script, ScriptDriver, ScriptSet};
pub use help::HELP_TEXT;
pub use interpreter::QueryError;
pub use parser::{ParsedQuery, QueryParser};
pub use query::{Query, SetOption};
pub use session::QuerySession;

/// Named value holding the diagnostic message template.
pub const DIAGNOSTIC_KEY: &str = "Diagnostic";

/// Named value holding the whitespace-separated binding names whose nodes
/// become the diagnostic arguments.
pub const DIAGNOSTIC_ARGS_KEY: &str = "DiagnosticArgs";

/// Name under which the matched root node is bound when `bind-root` is on.
pub const ROOT_BINDING: &str = "root";

#[cfg(test)]
mod tests;
