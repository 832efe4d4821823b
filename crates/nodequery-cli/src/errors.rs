//! Error types for the CLI runtime.

use std::io;

use camino::Utf8PathBuf;
use nodequery::DriverError;
use nodequery_syntax::SyntaxError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("no query script specified; pass at least one with --script")]
    NoScripts,
    #[error("failed to read query script {path}: {source}")]
    ReadScript {
        path: Utf8PathBuf,
        source: io::Error,
    },
    #[error("failed to read source file {path}: {source}")]
    ReadSource {
        path: Utf8PathBuf,
        source: io::Error,
    },
    #[error("could not determine language for {path}; pass --language")]
    UnknownLanguage { path: Utf8PathBuf },
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Driver(#[from] DriverError),
    #[error("failed to initialise logging: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("failed to serialise diagnostic: {0}")]
    SerialiseDiagnostic(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
