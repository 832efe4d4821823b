//! Incremental parsing of script text into queries.

use nodequery_core::{SyntaxTree, Value};
use tracing::trace;

use crate::lexer::Lexer;
use crate::query::{Query, SetOption};
use crate::session::QuerySession;

/// One query and the text left after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery<'a, P> {
    /// The parsed query.
    pub query: Query<P>,
    /// The unconsumed suffix of the input.
    pub remaining: &'a str,
    /// Byte offset in the input where the query's command word starts.
    pub offset: usize,
}

/// Parses script text one command at a time.
///
/// Parsing never fails: malformed commands become [`Query::Invalid`] and the
/// rest of their line is skipped. Every call on non-empty input consumes at
/// least one character.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl QueryParser {
    /// Parses the first command in `text`.
    ///
    /// Pattern arguments are compiled by the session's tree, and `@name`
    /// references are resolved against the session's named values.
    #[must_use]
    pub fn parse<'a, T: SyntaxTree + ?Sized>(
        text: &'a str,
        session: &QuerySession<'_, T>,
    ) -> ParsedQuery<'a, T::Pattern> {
        let mut lexer = Lexer::new(text);
        skip_blank_and_comment_lines(&mut lexer);
        let offset = lexer.position();
        if lexer.rest().is_empty() {
            return ParsedQuery {
                query: Query::NoOp,
                remaining: lexer.rest(),
                offset,
            };
        }

        let word = lexer.word();
        let query = parse_command(word, &mut lexer, session).unwrap_or_else(|message| {
            trace!(%message, "skipping the rest of an invalid line");
            lexer.skip_line();
            Query::Invalid { message }
        });
        ParsedQuery {
            query,
            remaining: lexer.rest(),
            offset,
        }
    }
}

fn skip_blank_and_comment_lines(lexer: &mut Lexer<'_>) {
    loop {
        lexer.skip_whitespace();
        if lexer.peek() != Some('#') {
            return;
        }
        lexer.skip_line();
    }
}

type CommandResult<P> = Result<Query<P>, String>;

fn parse_command<T: SyntaxTree + ?Sized>(
    word: &str,
    lexer: &mut Lexer<'_>,
    session: &QuerySession<'_, T>,
) -> CommandResult<T::Pattern> {
    match word.to_ascii_lowercase().as_str() {
        "match" | "m" => parse_match(lexer, session),
        "let" | "l" => parse_let(lexer, session),
        "unlet" => {
            let name = variable_name(lexer)?;
            finish(lexer, Query::Let { name, value: None })
        }
        "set" => parse_set(lexer),
        "enable" => parse_output_toggle(lexer, SetOption::EnableOutput),
        "disable" => parse_output_toggle(lexer, SetOption::DisableOutput),
        "quit" | "q" => finish(lexer, Query::Quit),
        "help" => finish(lexer, Query::Help),
        _ => Err(format!("unknown command: {word}")),
    }
}

fn finish<P>(lexer: &mut Lexer<'_>, query: Query<P>) -> CommandResult<P> {
    lexer
        .end_of_command()
        .map_err(|extra| format!("unexpected extra input: '{extra}'"))?;
    Ok(query)
}

fn at_line_end(lexer: &mut Lexer<'_>) -> bool {
    lexer.skip_horizontal_space();
    matches!(lexer.peek(), None | Some('\n'))
}

fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn variable_name(lexer: &mut Lexer<'_>) -> Result<String, String> {
    let name = lexer.word();
    if is_identifier(name) {
        Ok(name.to_owned())
    } else {
        Err("expected variable name".to_owned())
    }
}

/// Resolves an `@name` reference to a copy of the named value.
fn named_value<'s, T: SyntaxTree + ?Sized>(
    reference: &str,
    session: &'s QuerySession<'_, T>,
) -> Result<&'s Value<T::Pattern>, String> {
    let name = reference.strip_prefix('@').unwrap_or(reference);
    session
        .value(name)
        .ok_or_else(|| format!("unknown named value '{name}'"))
}

fn compile_pattern<T: SyntaxTree + ?Sized>(
    text: &str,
    session: &QuerySession<'_, T>,
) -> Result<T::Pattern, String> {
    session
        .tree()
        .parse_pattern(text)
        .map_err(|err| err.to_string())
}

fn parse_match<T: SyntaxTree + ?Sized>(
    lexer: &mut Lexer<'_>,
    session: &QuerySession<'_, T>,
) -> CommandResult<T::Pattern> {
    if at_line_end(lexer) {
        return Err("expected pattern".to_owned());
    }

    if lexer.peek() == Some('@') {
        let reference = lexer.word();
        let Some(pattern) = named_value(reference, session)?.as_pattern().cloned() else {
            let name = reference.trim_start_matches('@');
            return Err(format!("named value '{name}' is not a pattern"));
        };
        return finish(
            lexer,
            Query::Match {
                source: reference.to_owned(),
                pattern,
            },
        );
    }

    let source = lexer.rest_of_line();
    let pattern = compile_pattern(source, session)?;
    finish(
        lexer,
        Query::Match {
            source: source.to_owned(),
            pattern,
        },
    )
}

fn parse_let<T: SyntaxTree + ?Sized>(
    lexer: &mut Lexer<'_>,
    session: &QuerySession<'_, T>,
) -> CommandResult<T::Pattern> {
    let name = variable_name(lexer)?;
    if at_line_end(lexer) {
        return finish(lexer, Query::Let { name, value: None });
    }

    let value = match lexer.peek() {
        Some('"') => Value::String(
            lexer
                .string_literal()
                .ok_or_else(|| "unterminated string literal".to_owned())?,
        ),
        Some('@') => named_value(lexer.word(), session)?.clone(),
        _ => Value::Pattern(compile_pattern(lexer.rest_of_line(), session)?),
    };
    finish(
        lexer,
        Query::Let {
            name,
            value: Some(value),
        },
    )
}

fn option_name(lexer: &mut Lexer<'_>) -> Result<SetOption, String> {
    let word = lexer.word();
    match word.to_ascii_lowercase().as_str() {
        "" => Err("expected variable name".to_owned()),
        "bind-root" => Ok(SetOption::BindRoot),
        "print-matcher" => Ok(SetOption::PrintMatcher),
        "traversal" => Ok(SetOption::Traversal),
        "output" => Ok(SetOption::Output),
        _ => Err(format!("unknown variable: '{word}'")),
    }
}

fn parse_set<P>(lexer: &mut Lexer<'_>) -> CommandResult<P> {
    let option = option_name(lexer)?;
    let literal = lexer.word().to_owned();
    finish(lexer, Query::Set { option, literal })
}

/// Parses `enable output <feature>` or `disable output <feature>`.
fn parse_output_toggle<P>(lexer: &mut Lexer<'_>, option: SetOption) -> CommandResult<P> {
    let word = lexer.word();
    if word.is_empty() {
        return Err("expected variable name".to_owned());
    }
    if !word.eq_ignore_ascii_case("output") {
        return Err(format!("unknown variable: '{word}'"));
    }
    let literal = lexer.word().to_owned();
    finish(lexer, Query::Set { option, literal })
}
