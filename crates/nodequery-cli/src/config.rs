//! Resolved runtime configuration.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use nodequery::{Script, ScriptSet};
use nodequery_syntax::SupportedLanguage;
use tracing::debug;

use crate::cli::{Cli, OutputFormat};
use crate::errors::AppError;
use crate::telemetry::LogFormat;

/// Everything one invocation needs, validated.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    scripts: Vec<Utf8PathBuf>,
    sources: Vec<Utf8PathBuf>,
    language: Option<SupportedLanguage>,
    format: OutputFormat,
    log_filter: String,
    log_format: LogFormat,
}

impl Config {
    pub(crate) fn from_cli(cli: Cli) -> Result<Self, AppError> {
        if cli.scripts.is_empty() {
            return Err(AppError::NoScripts);
        }
        Ok(Self {
            scripts: cli.scripts,
            sources: cli.sources,
            language: cli.language,
            format: cli.format,
            log_filter: cli.log_filter,
            log_format: cli.log_format,
        })
    }

    pub(crate) fn sources(&self) -> &[Utf8PathBuf] {
        &self.sources
    }

    pub(crate) const fn format(&self) -> OutputFormat {
        self.format
    }

    pub(crate) fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub(crate) const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the language for `path`, preferring the `--language` override.
    pub(crate) fn language_for(&self, path: &Utf8Path) -> Result<SupportedLanguage, AppError> {
        self.language
            .or_else(|| SupportedLanguage::from_path(path.as_std_path()))
            .ok_or_else(|| AppError::UnknownLanguage {
                path: path.to_owned(),
            })
    }

    /// Reads every script file once, keeping command-line order.
    pub(crate) fn load_scripts(&self) -> Result<ScriptSet, AppError> {
        self.scripts
            .iter()
            .map(|path| {
                debug!(script = %path, "loading query script");
                fs::read_to_string(path)
                    .map(|contents| Script::new(path.as_str(), contents))
                    .map_err(|source| AppError::ReadScript {
                        path: path.clone(),
                        source,
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn parse(args: &[&str]) -> Result<Config, AppError> {
        let cli = Cli::try_parse_from(args).expect("arguments should parse");
        Config::from_cli(cli)
    }

    #[test]
    fn requires_a_script() {
        let error = parse(&["nodequery", "main.rs"]).expect_err("config should fail");
        assert_eq!(
            error.to_string(),
            "no query script specified; pass at least one with --script"
        );
    }

    #[test]
    fn detects_language_from_extension_unless_overridden() {
        let detected = parse(&["nodequery", "-s", "q.nq", "main.rs"]).expect("config");
        let python = detected.language_for(Utf8Path::new("app.py"));
        assert_eq!(python.ok(), Some(SupportedLanguage::Python));
        assert!(matches!(
            detected.language_for(Utf8Path::new("README")),
            Err(AppError::UnknownLanguage { .. })
        ));

        let args = ["nodequery", "-s", "q.nq", "--language", "rust", "main.rs"];
        let forced = parse(&args).expect("config");
        let readme = forced.language_for(Utf8Path::new("README"));
        assert_eq!(readme.ok(), Some(SupportedLanguage::Rust));
    }

    #[test]
    fn loads_scripts_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("first.nq");
        let second = dir.path().join("second.nq");
        fs::File::create(&first)
            .and_then(|mut file| file.write_all(b"help\n"))
            .expect("write first");
        fs::write(&second, "quit\n").expect("write second");

        let first_arg = first.to_str().expect("utf-8 path");
        let second_arg = second.to_str().expect("utf-8 path");
        let config = parse(&["nodequery", "-s", first_arg, "-s", second_arg, "main.rs"])
            .expect("config");
        let scripts = config.load_scripts().expect("scripts");

        let contents: Vec<&str> = scripts.scripts().iter().map(Script::contents).collect();
        assert_eq!(contents, vec!["help\n", "quit\n"]);
        assert_eq!(scripts.scripts()[0].name(), first_arg);
    }

    #[test]
    fn reports_missing_script_file() {
        let config = parse(&["nodequery", "-s", "/nonexistent/q.nq", "main.rs"]).expect("config");
        let error = config.load_scripts().expect_err("load should fail");
        assert!(
            error
                .to_string()
                .starts_with("failed to read query script /nonexistent/q.nq")
        );
    }
}
