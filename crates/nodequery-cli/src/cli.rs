//! CLI argument definitions for the nodequery runner.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use nodequery_syntax::SupportedLanguage;

use crate::telemetry::LogFormat;

/// Output format selection for emitted diagnostics.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render diagnostics with source context.
    Human,
    /// Always emit one JSON object per diagnostic.
    Json,
}

impl OutputFormat {
    /// Resolves `Auto` against whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
            Self::Auto if stdout_is_terminal => ResolvedOutputFormat::Human,
            Self::Auto => ResolvedOutputFormat::Json,
        }
    }
}

/// An output format with `Auto` already decided.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Source context with a caret under the match.
    Human,
    /// JSON lines.
    Json,
}

/// Runs query scripts over source files and reports the diagnostics they emit.
#[derive(Parser, Debug)]
#[command(name = "nodequery", version)]
pub(crate) struct Cli {
    /// A query script to run; repeat to run several in order.
    #[arg(short = 's', long = "script", value_name = "FILE")]
    pub(crate) scripts: Vec<Utf8PathBuf>,
    /// Forces the source language instead of detecting it from extensions.
    #[arg(long, value_name = "LANGUAGE")]
    pub(crate) language: Option<SupportedLanguage>,
    /// Controls how diagnostics are rendered.
    #[arg(long, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) format: OutputFormat,
    /// Tracing filter directive for log output on stderr.
    #[arg(long, value_name = "FILTER", default_value = "warn")]
    pub(crate) log_filter: String,
    /// Log line format: `compact` or `json`.
    #[arg(long, value_name = "FORMAT", default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
    /// Source files to analyse.
    #[arg(value_name = "SOURCE", required = true)]
    pub(crate) sources: Vec<Utf8PathBuf>,
}
