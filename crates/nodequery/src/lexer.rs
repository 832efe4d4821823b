//! Cursor over script text used by the query parser.
//!
//! Command words may be preceded by any whitespace, including newlines.
//! Every other token is lexed within the current line.

/// A position within script text.
pub(crate) struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

const fn is_horizontal_space(c: char) -> bool {
    c.is_whitespace() && c != '\n'
}

impl<'a> Lexer<'a> {
    pub(crate) const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Returns the byte offset of the cursor.
    pub(crate) const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unconsumed text.
    pub(crate) fn rest(&self) -> &'a str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.text.len());
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest.find(|c: char| !keep(c)).unwrap_or(rest.len());
        self.advance(len);
        rest.get(..len).unwrap_or_default()
    }

    /// Skips all whitespace, newlines included.
    pub(crate) fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }

    /// Skips spaces and tabs, stopping at a newline.
    pub(crate) fn skip_horizontal_space(&mut self) {
        self.take_while(is_horizontal_space);
    }

    /// Returns the next whitespace-delimited word on this line, or an empty
    /// string at the end of the line.
    pub(crate) fn word(&mut self) -> &'a str {
        self.skip_horizontal_space();
        self.take_while(|c| !c.is_whitespace())
    }

    /// Consumes the rest of the line, leaving the newline, and returns it
    /// with surrounding whitespace removed.
    pub(crate) fn rest_of_line(&mut self) -> &'a str {
        self.take_while(|c| c != '\n').trim()
    }

    /// Moves past the next newline, or to the end of the text.
    pub(crate) fn skip_line(&mut self) {
        self.take_while(|c| c != '\n');
        self.advance(1);
    }

    /// Lexes a double-quoted string literal. The cursor must be on the
    /// opening quote. Returns `None` if the line ends before the closing
    /// quote.
    pub(crate) fn string_literal(&mut self) -> Option<String> {
        let rest = self.rest();
        let mut chars = rest.char_indices().skip(1);
        let mut value = String::new();

        while let Some((index, c)) = chars.next() {
            match c {
                '"' => {
                    self.advance(index + 1);
                    return Some(value);
                }
                '\n' => break,
                '\\' => match chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, '\n')) | None => break,
                    Some((_, other)) => value.push(other),
                },
                other => value.push(other),
            }
        }
        None
    }

    /// Accepts the end of a command: optional spaces, then an optional `#`
    /// comment, then a newline or the end of the text.
    ///
    /// Returns the unexpected text otherwise.
    pub(crate) fn end_of_command(&mut self) -> Result<(), &'a str> {
        self.skip_horizontal_space();
        match self.peek() {
            None | Some('\n' | '#') => {
                self.skip_line();
                Ok(())
            }
            Some(_) => Err(self.rest_of_line()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn words_stop_at_line_end() {
        let mut lexer = Lexer::new("set  output\nnext");
        assert_eq!(lexer.word(), "set");
        assert_eq!(lexer.word(), "output");
        assert_eq!(lexer.word(), "");
        assert_eq!(lexer.rest(), "\nnext");
    }

    #[rstest]
    #[case(r#""plain" tail"#, Some("plain"), " tail")]
    #[case(r#""say \"hi\"\t\\""#, Some("say \"hi\"\t\\"), "")]
    #[case(r#""a\nb""#, Some("a\nb"), "")]
    #[case("\"open\nclosed\"", None, "\"open\nclosed\"")]
    fn string_literals_unescape(
        #[case] text: &str,
        #[case] expected: Option<&str>,
        #[case] rest: &str,
    ) {
        let mut lexer = Lexer::new(text);
        assert_eq!(lexer.string_literal().as_deref(), expected);
        assert_eq!(lexer.rest(), rest);
    }

    #[rstest]
    #[case("   \nnext", Ok(()), "next")]
    #[case(" # trailing note\nnext", Ok(()), "next")]
    #[case("", Ok(()), "")]
    #[case(" extra words\nnext", Err("extra words"), "\nnext")]
    fn commands_end_cleanly_or_report_extra_input(
        #[case] text: &str,
        #[case] expected: Result<(), &str>,
        #[case] rest: &str,
    ) {
        let mut lexer = Lexer::new(text);
        assert_eq!(lexer.end_of_command(), expected);
        assert_eq!(lexer.rest(), rest);
    }
}
