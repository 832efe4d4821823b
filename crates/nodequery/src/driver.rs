//! Running whole scripts.

use std::io::Write;

use nodequery_core::{DiagnosticSink, SyntaxTree};
use thiserror::Error;
use tracing::{debug, info};

use crate::interpreter::QueryError;
use crate::parser::QueryParser;
use crate::session::QuerySession;

/// A named query script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    name: String,
    contents: String,
}

impl Script {
    /// Creates a script from its display name and text.
    #[must_use]
    pub fn new(name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contents: contents.into(),
        }
    }

    /// Returns the name used in error reports.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the script text.
    #[must_use]
    pub fn contents(&self) -> &str {
        &self.contents
    }
}

/// The scripts of one run, in execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptSet {
    scripts: Vec<Script>,
}

impl ScriptSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scripts: Vec::new(),
        }
    }

    /// Appends a script.
    pub fn push(&mut self, script: Script) {
        self.scripts.push(script);
    }

    /// Returns the scripts in order.
    #[must_use]
    pub fn scripts(&self) -> &[Script] {
        &self.scripts
    }

    /// Returns the number of scripts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl FromIterator<Script> for ScriptSet {
    fn from_iter<I: IntoIterator<Item = Script>>(iter: I) -> Self {
        Self {
            scripts: iter.into_iter().collect(),
        }
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverOutcome {
    /// Every script ran to the end.
    Completed,
    /// A `quit` stopped the run early.
    Terminated,
}

/// A failed run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DriverError {
    /// A query failed; later queries and scripts did not run.
    #[error("query execution failed in {script} at line {line}")]
    QueryFailed {
        /// Name of the script holding the failing query.
        script: String,
        /// One-based line of the failing command.
        line: usize,
        /// The query's error.
        #[source]
        source: QueryError,
    },
}

impl DriverError {
    /// Returns the one-based line of the failing command.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::QueryFailed { line, .. } => *line,
        }
    }

    /// Returns the name of the failing script.
    #[must_use]
    pub fn script(&self) -> &str {
        match self {
            Self::QueryFailed { script, .. } => script,
        }
    }
}

/// Runs a [`ScriptSet`] against one tree.
#[derive(Debug, Clone, Copy)]
pub struct ScriptDriver<'s> {
    scripts: &'s ScriptSet,
}

impl<'s> ScriptDriver<'s> {
    /// Creates a driver for `scripts`.
    #[must_use]
    pub const fn new(scripts: &'s ScriptSet) -> Self {
        Self { scripts }
    }

    /// Runs every script in order, each in a fresh session over `tree`.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::QueryFailed`] for the first failing query.
    pub fn run<T, W, S>(
        &self,
        tree: &T,
        out: &mut W,
        sink: &mut S,
    ) -> Result<DriverOutcome, DriverError>
    where
        T: SyntaxTree + ?Sized,
        W: Write + ?Sized,
        S: DiagnosticSink + ?Sized,
    {
        for script in self.scripts.scripts() {
            info!(script = script.name(), "running query script");
            let mut session = QuerySession::new(tree);
            run_script(script, &mut session, out, sink)?;
            if session.is_terminated() {
                info!(script = script.name(), "query script requested termination");
                return Ok(DriverOutcome::Terminated);
            }
        }
        Ok(DriverOutcome::Completed)
    }
}

fn run_script<T, W, S>(
    script: &Script,
    session: &mut QuerySession<'_, T>,
    out: &mut W,
    sink: &mut S,
) -> Result<(), DriverError>
where
    T: SyntaxTree + ?Sized,
    W: Write + ?Sized,
    S: DiagnosticSink + ?Sized,
{
    let contents = script.contents();
    let mut remaining = contents;
    while !remaining.is_empty() && !session.is_terminated() {
        let consumed = contents.len() - remaining.len();
        let parsed = QueryParser::parse(remaining, session);
        let start = consumed + parsed.offset;
        debug!(
            script = script.name(),
            offset = start,
            kind = parsed.query.kind(),
            "parsed query"
        );

        parsed
            .query
            .run(session, out, sink)
            .map_err(|source| DriverError::QueryFailed {
                script: script.name().to_owned(),
                line: line_of(contents, start),
                source,
            })?;
        remaining = parsed.remaining;
    }
    Ok(())
}

/// Returns the one-based line holding byte `offset`.
fn line_of(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(0, |prefix| prefix.matches('\n').count())
        + 1
}
