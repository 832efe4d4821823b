//! The commands a script can contain.

use std::fmt;

use nodequery_core::Value;

/// One parsed command, generic over the backend's compiled pattern type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query<P> {
    /// Text that could not be parsed; running it reports `message`.
    Invalid {
        /// Human-readable description of the problem.
        message: String,
    },
    /// Nothing to do: blank text or a comment.
    NoOp,
    /// Print the command reference.
    Help,
    /// Stop this script and every later one.
    Quit,
    /// Bind `name` to `value`, or remove it when `value` is `None`.
    Let {
        /// The name being bound.
        name: String,
        /// The new value.
        value: Option<Value<P>>,
    },
    /// Change a session option; `literal` is validated when the query runs.
    Set {
        /// The option being changed.
        option: SetOption,
        /// The unparsed option value.
        literal: String,
    },
    /// Match a pattern and emit the session's diagnostic for each match.
    Match {
        /// The pattern argument as written.
        source: String,
        /// The compiled pattern.
        pattern: P,
    },
}

impl<P> Query<P> {
    /// Creates an invalid query.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Returns the command keyword, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "invalid",
            Self::NoOp => "noop",
            Self::Help => "help",
            Self::Quit => "quit",
            Self::Let { .. } => "let",
            Self::Set { .. } => "set",
            Self::Match { .. } => "match",
        }
    }
}

/// A session option targeted by `set`, `enable` or `disable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOption {
    /// `set bind-root <bool>`.
    BindRoot,
    /// `set print-matcher <bool>`.
    PrintMatcher,
    /// `set traversal <kind>`.
    Traversal,
    /// `set output <feature>`: the feature becomes the only one enabled.
    Output,
    /// `enable output <feature>`.
    EnableOutput,
    /// `disable output <feature>`.
    DisableOutput,
}

impl fmt::Display for SetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::BindRoot => "set bind-root",
            Self::PrintMatcher => "set print-matcher",
            Self::Traversal => "set traversal",
            Self::Output => "set output",
            Self::EnableOutput => "enable output",
            Self::DisableOutput => "disable output",
        })
    }
}
