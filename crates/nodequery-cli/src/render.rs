//! Rendering of emitted diagnostics.

use std::io::{self, Write};

use camino::Utf8Path;
use nodequery_core::{Diagnostic, LineCol, Severity, SourceRange};
use serde::Serialize;
use unicode_width::UnicodeWidthChar;

const CONTEXT_LINES: u32 = 2;

/// Writes `diagnostic` with surrounding source lines and a caret line.
pub(crate) fn render_human<W: Write + ?Sized>(
    out: &mut W,
    path: &Utf8Path,
    source: &str,
    diagnostic: &Diagnostic,
) -> io::Result<()> {
    let location = diagnostic.location();
    let (line, column) = location.one_based();
    writeln!(out, "{}: {}", diagnostic.severity(), diagnostic.message())?;
    writeln!(out, "  --> {path}:{line}:{column}")?;

    let lines: Vec<&str> = source.lines().collect();
    let total = u32::try_from(lines.len()).unwrap_or(u32::MAX);
    if line > total {
        writeln!(out, "  note: line out of range")?;
        return Ok(());
    }

    let first = line.saturating_sub(CONTEXT_LINES).max(1);
    let last = line.saturating_add(CONTEXT_LINES).min(total);
    let width = last.to_string().len();
    writeln!(out, "{:>width$} |", "")?;

    for current in first..=last {
        let text = usize::try_from(current - 1)
            .ok()
            .and_then(|index| lines.get(index))
            .copied()
            .unwrap_or_default();
        if text.is_empty() {
            writeln!(out, "{current:>width$} |")?;
        } else {
            writeln!(out, "{current:>width$} | {text}")?;
        }
        if current == line {
            let caret = caret_line(text, location, diagnostic.ranges().first());
            writeln!(out, "{:>width$} | {caret}", "")?;
        }
    }
    Ok(())
}

/// Builds the marker line: padding up to the anchor, `^`, then `~` under the
/// rest of the first range when it ends on the same line.
fn caret_line(text: &str, location: LineCol, range: Option<&SourceRange>) -> String {
    let start = usize::try_from(location.column).unwrap_or(usize::MAX);
    let mut caret = String::new();
    let mut underline = 0_usize;

    for (offset, ch) in text.char_indices() {
        let columns = ch.width().unwrap_or(0);
        if offset < start {
            if ch == '\t' {
                caret.push('\t');
            } else {
                caret.extend(std::iter::repeat_n(' ', columns));
            }
        } else if range.is_some_and(|span| covers(span, location, offset)) {
            underline += columns;
        }
    }

    caret.push('^');
    caret.extend(std::iter::repeat_n('~', underline.saturating_sub(1)));
    caret
}

fn covers(range: &SourceRange, location: LineCol, offset: usize) -> bool {
    range.start().line == location.line
        && range.end().line == location.line
        && usize::try_from(range.end().column).is_ok_and(|end| offset < end)
}

#[derive(Serialize)]
struct DiagnosticRecord<'a> {
    path: &'a Utf8Path,
    severity: Severity,
    message: &'a str,
    line: u32,
    column: u32,
    ranges: &'a [SourceRange],
    arguments: &'a [String],
}

/// Writes `diagnostic` as one JSON object followed by a newline.
pub(crate) fn render_json<W: Write + ?Sized>(
    out: &mut W,
    path: &Utf8Path,
    diagnostic: &Diagnostic,
) -> Result<(), serde_json::Error> {
    let (line, column) = diagnostic.location().one_based();
    let record = DiagnosticRecord {
        path,
        severity: diagnostic.severity(),
        message: diagnostic.message(),
        line,
        column,
        ranges: diagnostic.ranges(),
        arguments: diagnostic.arguments(),
    };
    serde_json::to_writer(&mut *out, &record)?;
    writeln!(out).map_err(serde_json::Error::io)
}
