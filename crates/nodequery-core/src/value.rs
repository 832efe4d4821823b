//! Typed values stored in a query session.

use std::collections::HashMap;

/// A value bound to a name with `let`.
///
/// Values are either plain strings (diagnostic messages, argument lists) or
/// compiled patterns owned by the pattern backend. A value is never mutated
/// after construction; rebinding a name replaces the whole value.
///
/// # Example
///
/// ```
/// use nodequery_core::Value;
///
/// let value: Value<()> = Value::string("function %0 is too long");
/// assert_eq!(value.as_str(), Some("function %0 is too long"));
/// assert!(value.as_pattern().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<P> {
    /// A string value, written as a quoted literal in scripts.
    String(String),
    /// A compiled pattern expression.
    Pattern(P),
}

impl<P> Value<P> {
    /// Creates a string value.
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::String(text.into())
    }

    /// Returns the string payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            Self::Pattern(_) => None,
        }
    }

    /// Returns the pattern payload, if this is a pattern value.
    #[must_use]
    pub const fn as_pattern(&self) -> Option<&P> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            Self::String(_) => None,
        }
    }
}

/// Mapping from identifier to value; keys are unique.
pub type NamedValues<P> = HashMap<String, Value<P>>;
