//! Grammar selection for the languages queries can run against.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Languages a query session can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// Rust source files (`.rs`).
    #[default]
    Rust,
    /// Python source files (`.py`, `.pyi`).
    Python,
    /// TypeScript source files (`.ts`, `.tsx`, `.mts`, `.cts`).
    TypeScript,
}

impl SupportedLanguage {
    /// Every supported language, in display order.
    pub const ALL: [Self; 3] = [Self::Rust, Self::Python, Self::TypeScript];

    /// Maps a file extension to a language, ignoring ASCII case.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "rs" => Some(Self::Rust),
            "py" | "pyi" => Some(Self::Python),
            "ts" | "tsx" | "mts" | "cts" => Some(Self::TypeScript),
            _ => None,
        }
    }

    /// Maps a path to a language through its extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the Tree-sitter grammar.
    #[must_use]
    pub fn grammar(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            // TSX is a superset, so one grammar serves both extensions.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    /// Returns the lower-case identifier used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rust => "rust",
            Self::Python => "python",
            Self::TypeScript => "typescript",
        }
    }

    /// Embeds a pattern fragment in a function body so statement-level
    /// patterns parse.
    #[must_use]
    pub(crate) fn wrap_fragment(self, fragment: &str) -> String {
        match self {
            Self::Rust => {
                let trimmed = fragment.trim_end();
                if trimmed.ends_with(';') || trimmed.ends_with('}') {
                    format!("fn {WRAPPER_NAME}() {{ {trimmed} }}")
                } else {
                    format!("fn {WRAPPER_NAME}() {{ {trimmed}; }}")
                }
            }
            Self::Python => {
                let mut out = format!("def {WRAPPER_NAME}():\n");
                for line in fragment.lines() {
                    out.push_str("    ");
                    out.push_str(line);
                    out.push('\n');
                }
                out
            }
            Self::TypeScript => format!("function {WRAPPER_NAME}() {{ {fragment} }}"),
        }
    }
}

const WRAPPER_NAME: &str = "__nodequery_pattern__";

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when a language name is not recognised.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported language: '{0}'")]
pub struct LanguageParseError(String);

impl LanguageParseError {
    /// Returns the rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.0
    }
}

impl FromStr for SupportedLanguage {
    type Err = LanguageParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalised = input.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str() == normalised)
            .or_else(|| Self::from_extension(&normalised))
            .ok_or(LanguageParseError(normalised))
    }
}
