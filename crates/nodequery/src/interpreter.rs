//! Execution of parsed queries against a session.

use std::io::{self, Write};

use nodequery_core::{
    BoundNode, DiagnosticSink, OutputFeature, OutputFeatures, PatternError, Severity, SyntaxTree,
    TraversalKind, Value,
};
use thiserror::Error;
use tracing::{debug, trace};

use crate::help::HELP_TEXT;
use crate::query::{Query, SetOption};
use crate::session::QuerySession;
use crate::{DIAGNOSTIC_ARGS_KEY, DIAGNOSTIC_KEY, ROOT_BINDING};

/// Why a query failed.
///
/// Except for [`QueryError::Output`], the message has already been written
/// to the query output when this is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QueryError {
    /// The command could not be parsed.
    #[error("{message}")]
    Invalid {
        /// The parser's message.
        message: String,
    },
    /// A boolean option was given something other than `true` or `false`.
    #[error("expected 'true' or 'false', got '{literal}'")]
    InvalidBool {
        /// The rejected literal.
        literal: String,
    },
    /// `set traversal` was given an unknown kind.
    #[error("expected traversal kind, got '{literal}'")]
    UnknownTraversal {
        /// The rejected literal.
        literal: String,
    },
    /// An output command was given an unknown feature.
    #[error("expected 'diag', 'print', 'detailed-ast', 'srcloc' or 'dump', got '{literal}'")]
    UnknownOutput {
        /// The rejected literal.
        literal: String,
    },
    /// The pattern backend rejected the pattern.
    #[error(transparent)]
    Pattern(#[from] PatternError),
    /// A diagnostic argument names a binding the match does not have.
    #[error("Couldn't find bound node '{name}'")]
    MissingBinding {
        /// The unresolved binding name.
        name: String,
    },
    /// Writing query output failed.
    #[error("failed to write query output: {0}")]
    Output(#[from] io::Error),
}

impl QueryError {
    fn missing_binding(name: &str) -> Self {
        Self::MissingBinding {
            name: name.to_owned(),
        }
    }
}

impl<P: Clone> Query<P> {
    /// Runs this query against `session`.
    ///
    /// Text output (help, error messages) goes to `out`; diagnostics for
    /// matches go to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when the query fails. Its message is written
    /// to `out` as one line before returning.
    pub fn run<T, W, S>(
        &self,
        session: &mut QuerySession<'_, T>,
        out: &mut W,
        sink: &mut S,
    ) -> Result<(), QueryError>
    where
        T: SyntaxTree<Pattern = P> + ?Sized,
        W: Write + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        debug!(kind = self.kind(), "running query");
        let result = self.execute(session, out, sink);
        match &result {
            Ok(()) | Err(QueryError::Output(_)) => {}
            Err(err) => writeln!(out, "{err}")?,
        }
        result
    }

    fn execute<T, W, S>(
        &self,
        session: &mut QuerySession<'_, T>,
        out: &mut W,
        sink: &mut S,
    ) -> Result<(), QueryError>
    where
        T: SyntaxTree<Pattern = P> + ?Sized,
        W: Write + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        match self {
            Self::Invalid { message } => Err(QueryError::Invalid {
                message: message.clone(),
            }),
            Self::NoOp => Ok(()),
            Self::Help => Ok(out.write_all(HELP_TEXT.as_bytes())?),
            Self::Quit => {
                session.terminate();
                Ok(())
            }
            Self::Let { name, value } => {
                match value {
                    Some(value) => session.set_value(name.clone(), value.clone()),
                    None => session.remove_value(name),
                }
                Ok(())
            }
            Self::Set { option, literal } => apply_set(session, *option, literal),
            Self::Match { source, pattern } => run_match(session, source, pattern, sink),
        }
    }
}

fn parse_bool(literal: &str) -> Result<bool, QueryError> {
    match literal {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(QueryError::InvalidBool {
            literal: literal.to_owned(),
        }),
    }
}

fn parse_output(literal: &str) -> Result<OutputFeature, QueryError> {
    literal.parse().map_err(|_| QueryError::UnknownOutput {
        literal: literal.to_owned(),
    })
}

/// Validates `literal` and only then updates the session.
fn apply_set<T: SyntaxTree + ?Sized>(
    session: &mut QuerySession<'_, T>,
    option: SetOption,
    literal: &str,
) -> Result<(), QueryError> {
    match option {
        SetOption::BindRoot => session.set_bind_root(parse_bool(literal)?),
        SetOption::PrintMatcher => session.set_print_matcher(parse_bool(literal)?),
        SetOption::Traversal => {
            let traversal: TraversalKind =
                literal.parse().map_err(|_| QueryError::UnknownTraversal {
                    literal: literal.to_owned(),
                })?;
            session.set_traversal(traversal);
        }
        SetOption::Output => {
            *session.output_mut() = OutputFeatures::only(parse_output(literal)?);
        }
        SetOption::EnableOutput => session.output_mut().enable(parse_output(literal)?),
        SetOption::DisableOutput => session.output_mut().disable(parse_output(literal)?),
    }
    trace!(%option, literal, "updated session option");
    Ok(())
}

/// Returns the binding names whose nodes fill the diagnostic placeholders.
fn diagnostic_arguments<T: SyntaxTree + ?Sized>(session: &QuerySession<'_, T>) -> Vec<String> {
    let names: Vec<String> = session
        .value(DIAGNOSTIC_ARGS_KEY)
        .and_then(Value::as_str)
        .map(|text| text.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default();
    if names.is_empty() {
        vec![ROOT_BINDING.to_owned()]
    } else {
        names
    }
}

fn run_match<T, S>(
    session: &QuerySession<'_, T>,
    source: &str,
    pattern: &T::Pattern,
    sink: &mut S,
) -> Result<(), QueryError>
where
    T: SyntaxTree + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let Some(message) = session.value(DIAGNOSTIC_KEY).and_then(Value::as_str) else {
        debug!(
            pattern = source,
            "no string Diagnostic value; skipping match"
        );
        return Ok(());
    };
    let arguments = diagnostic_arguments(session);
    let tree = session.tree();

    let bound = if session.bind_root() {
        tree.try_bind_root(pattern, ROOT_BINDING)
    } else {
        None
    };
    let effective = bound.as_ref().unwrap_or(pattern);

    let matches = tree.match_all(effective, session.traversal())?;
    debug!(pattern = source, count = matches.len(), "pattern matched");
    let template = sink.register_template(Severity::Warning, message);

    for bindings in &matches {
        let nodes = arguments
            .iter()
            .map(|name| {
                bindings
                    .get(name)
                    .ok_or_else(|| QueryError::missing_binding(name))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let Some(range) = nodes.first().and_then(|node| node.source_range()) else {
            trace!(pattern = source, "skipping match without a source location");
            continue;
        };

        nodes
            .iter()
            .fold(
                sink.report(template, range.start()).range(range),
                |builder, node| builder.arg(node.pretty_print()),
            )
            .emit();
    }
    Ok(())
}
