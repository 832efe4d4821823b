//! Command-line runtime for nodequery.
//!
//! The runtime parses arguments into a [`Config`](config::Config), reads every
//! query script once, then runs the whole script set over each source file in
//! turn. Diagnostics emitted by `match` commands are rendered after each file,
//! either with source context for people or as JSON lines for tools. Query
//! output such as `help` text and per-query errors goes to stdout as it is
//! produced; a failing query stops the run with an `Error:` line on stderr.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::process::ExitCode;

use camino::Utf8Path;
use clap::Parser as _;
use nodequery::{DriverOutcome, ScriptDriver, ScriptSet};
use nodequery_core::{Diagnostic, DiagnosticEngine};
use nodequery_syntax::{ParseResult, Parser};
use tracing::{info, warn};

mod cli;
mod config;
mod errors;
mod render;
mod telemetry;

use cli::Cli;
pub use cli::{OutputFormat, ResolvedOutputFormat};
use config::Config;
use errors::AppError;
pub use telemetry::{LogFormat, TelemetryError};

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E, stdout_is_terminal: bool) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    match execute(args, stdout, stdout_is_terminal) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) => report_usage(&error, stdout, stderr),
        Err(error) => {
            let _ = writeln!(stderr, "Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<I, W>(args: I, stdout: &mut W, stdout_is_terminal: bool) -> Result<(), AppError>
where
    I: IntoIterator<Item = OsString>,
    W: Write,
{
    let cli = Cli::try_parse_from(args).map_err(AppError::CliUsage)?;
    let config = Config::from_cli(cli)?;
    telemetry::initialise(config.log_filter(), config.log_format())?;

    let scripts = config.load_scripts()?;
    let format = config.format().resolve(stdout_is_terminal);
    run_sources(&config, &scripts, format, stdout)
}

fn run_sources<W: Write>(
    config: &Config,
    scripts: &ScriptSet,
    format: ResolvedOutputFormat,
    stdout: &mut W,
) -> Result<(), AppError> {
    let driver = ScriptDriver::new(scripts);
    let mut engine = DiagnosticEngine::new();

    for path in config.sources() {
        let tree = parse_source(config, path)?;
        info!(source = %path, scripts = scripts.len(), "running scripts");
        let result = driver.run(&tree, stdout, &mut engine);
        emit(
            stdout,
            format,
            path,
            tree.source(),
            &engine.take_diagnostics(),
        )?;

        if result? == DriverOutcome::Terminated {
            info!(source = %path, "run terminated by quit");
            break;
        }
    }
    stdout.flush().map_err(AppError::WriteOutput)
}

fn parse_source(config: &Config, path: &Utf8Path) -> Result<ParseResult, AppError> {
    let language = config.language_for(path)?;
    let contents = fs::read_to_string(path).map_err(|source| AppError::ReadSource {
        path: path.to_owned(),
        source,
    })?;
    let mut parser = Parser::new(language)?;
    let tree = parser.parse(&contents)?;

    for error in tree.errors() {
        warn!(
            source = %path,
            line = error.line,
            column = error.column,
            context = %error.context,
            "{}",
            error.message
        );
    }
    Ok(tree)
}

fn emit<W: Write>(
    out: &mut W,
    format: ResolvedOutputFormat,
    path: &Utf8Path,
    source: &str,
    diagnostics: &[Diagnostic],
) -> Result<(), AppError> {
    for diagnostic in diagnostics {
        match format {
            ResolvedOutputFormat::Human => render::render_human(out, path, source, diagnostic)
                .and_then(|()| writeln!(out))
                .map_err(AppError::WriteOutput)?,
            ResolvedOutputFormat::Json => render::render_json(out, path, diagnostic)
                .map_err(AppError::SerialiseDiagnostic)?,
        }
    }
    Ok(())
}

fn report_usage<W: Write, E: Write>(
    error: &clap::Error,
    stdout: &mut W,
    stderr: &mut E,
) -> ExitCode {
    let rendered = error.render();
    if error.use_stderr() {
        let _ = write!(stderr, "{rendered}");
    } else {
        let _ = write!(stdout, "{rendered}");
    }
    u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}
