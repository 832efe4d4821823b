//! Templated diagnostics anchored to source ranges.
//!
//! A diagnostic is produced in two steps. A message template is registered
//! once with a severity and receives a [`TemplateId`]; each report then names
//! that template, an anchor position, the ranges to highlight, and the ordered
//! arguments that fill the template's `%0`, `%1`, … placeholders.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::span::{LineCol, SourceRange};

/// How serious a diagnostic is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Severity {
    /// Supplementary information attached to another diagnostic.
    Note,
    /// A finding that does not stop processing.
    Warning,
    /// A finding that should fail the run.
    Error,
}

/// Identifies a registered message template within one sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId(u32);

impl TemplateId {
    /// Returns the raw index of this template.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

/// A registered message template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticTemplate {
    severity: Severity,
    message: String,
}

impl DiagnosticTemplate {
    /// Returns the template severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the unformatted message text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One emitted diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    severity: Severity,
    template: String,
    message: String,
    location: LineCol,
    ranges: Vec<SourceRange>,
    arguments: Vec<String>,
}

impl Diagnostic {
    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the message with every placeholder substituted.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the unformatted template text.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the anchor position.
    #[must_use]
    pub const fn location(&self) -> LineCol {
        self.location
    }

    /// Returns the highlighted ranges in the order they were attached.
    #[must_use]
    pub fn ranges(&self) -> &[SourceRange] {
        &self.ranges
    }

    /// Returns the ordered template arguments.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.location.one_based();
        write!(f, "{line}:{column}: {}: {}", self.severity, self.message)
    }
}

/// Substitutes positional placeholders in `template`.
///
/// `%N` is replaced by `arguments[N]`; `%%` produces a literal `%`.
/// Placeholders without a matching argument are kept verbatim.
///
/// # Example
///
/// ```
/// use nodequery_core::format_message;
///
/// let text = format_message("%0 calls %1 (100%%)", &["main", "exit"]);
/// assert_eq!(text, "main calls exit (100%)");
/// ```
#[must_use]
pub fn format_message<S: AsRef<str>>(template: &str, arguments: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }

        if chars.peek().is_some_and(|(_, next)| *next == '%') {
            chars.next();
            out.push('%');
            continue;
        }

        let mut digits = String::new();
        while let Some((_, digit)) = chars.peek().copied().filter(|(_, c)| c.is_ascii_digit()) {
            digits.push(digit);
            chars.next();
        }

        let argument = digits
            .parse::<usize>()
            .ok()
            .and_then(|index| arguments.get(index));
        match argument {
            Some(argument) => out.push_str(argument.as_ref()),
            None => {
                out.push('%');
                out.push_str(&digits);
            }
        }
    }

    out
}

/// A destination for diagnostics.
pub trait DiagnosticSink {
    /// Registers a message template and returns its identifier.
    ///
    /// Registering the same severity and message twice returns the same
    /// identifier.
    fn register_template(&mut self, severity: Severity, message: &str) -> TemplateId;

    /// Looks up a registered template.
    fn template(&self, id: TemplateId) -> Option<&DiagnosticTemplate>;

    /// Accepts a finished diagnostic.
    fn submit(&mut self, diagnostic: Diagnostic);

    /// Starts a diagnostic for template `id` anchored at `location`.
    fn report(&mut self, id: TemplateId, location: LineCol) -> DiagnosticBuilder<'_, Self> {
        DiagnosticBuilder {
            sink: self,
            id,
            location,
            ranges: Vec::new(),
            arguments: Vec::new(),
        }
    }
}

/// Collects the ranges and arguments of one diagnostic before emitting it.
#[must_use = "a diagnostic is only recorded once `emit` is called"]
pub struct DiagnosticBuilder<'s, S: DiagnosticSink + ?Sized> {
    sink: &'s mut S,
    id: TemplateId,
    location: LineCol,
    ranges: Vec<SourceRange>,
    arguments: Vec<String>,
}

impl<S: DiagnosticSink + ?Sized> DiagnosticBuilder<'_, S> {
    /// Attaches a range to highlight.
    pub fn range(mut self, range: SourceRange) -> Self {
        self.ranges.push(range);
        self
    }

    /// Appends the next positional argument.
    pub fn arg(mut self, argument: impl Into<String>) -> Self {
        self.arguments.push(argument.into());
        self
    }

    /// Formats the diagnostic and hands it to the sink.
    pub fn emit(self) {
        let Some(template) = self.sink.template(self.id) else {
            warn!(
                template = self.id.index(),
                "dropping diagnostic for unknown template"
            );
            return;
        };
        let diagnostic = Diagnostic {
            severity: template.severity,
            message: format_message(&template.message, &self.arguments),
            template: template.message.clone(),
            location: self.location,
            ranges: self.ranges,
            arguments: self.arguments,
        };
        self.sink.submit(diagnostic);
    }
}

/// An in-memory [`DiagnosticSink`] that records every diagnostic.
#[derive(Debug, Default)]
pub struct DiagnosticEngine {
    templates: Vec<DiagnosticTemplate>,
    lookup: HashMap<(Severity, String), TemplateId>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticEngine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the diagnostics emitted so far, in emission order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Removes and returns the emitted diagnostics, keeping the templates.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Returns the number of registered templates.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Returns how many emitted diagnostics have `severity`.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity == severity)
            .count()
    }
}

impl DiagnosticSink for DiagnosticEngine {
    fn register_template(&mut self, severity: Severity, message: &str) -> TemplateId {
        let key = (severity, message.to_owned());
        if let Some(id) = self.lookup.get(&key) {
            return *id;
        }

        let index = u32::try_from(self.templates.len()).unwrap_or(u32::MAX);
        let id = TemplateId(index);
        self.templates.push(DiagnosticTemplate {
            severity,
            message: message.to_owned(),
        });
        self.lookup.insert(key, id);
        id
    }

    fn template(&self, id: TemplateId) -> Option<&DiagnosticTemplate> {
        usize::try_from(id.0)
            .ok()
            .and_then(|index| self.templates.get(index))
    }

    fn submit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
