//! Tokenizer turning descriptor file text into a stream of tokens

use tracing::trace;

use super::error::ParsingError;
use super::options::{Grammar, Options};

/// Location of a character within the input. Line and column are 1-origin,
/// with columns counted in characters rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    String,
    Number,
    BlockOpen,
    BlockClose,
    EndOfInput,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: Position,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: Position) -> Token {
        Token {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Word | TokenKind::String | TokenKind::Number
        )
    }

    /// How the token should be quoted back to a human in a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of file".to_string(),
            TokenKind::String => format!("\"{}\"", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug)]
pub struct Lexer {
    source: String,
    grammar: Grammar,
    position: Position,
    started: bool,
}

impl Lexer {
    pub fn new(source: String, options: &Options) -> Lexer {
        Lexer {
            source,
            grammar: options.grammar,
            position: Position::START,
            started: false,
        }
    }

    /// The text of the given (1-origin) line, for use in diagnostics.
    pub fn line_text(&self, line: usize) -> &str {
        self.source
            .lines()
            .nth(line.saturating_sub(1))
            .unwrap_or("")
    }

    fn rest(&self) -> &str {
        &self.source[self.position.offset..]
    }

    fn current(&self) -> Option<char> {
        self.rest()
            .chars()
            .next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.current()?;
        self.position.offset += c.len_utf8();
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.bump() {
            if c == '\n' {
                break;
            }
        }
    }

    fn skip_preamble(&mut self) {
        self.started = true;

        if self.current() == Some('\u{feff}') {
            // a byte order mark doesn't occupy a column
            self.position.offset += '\u{feff}'.len_utf8();
        }

        if let Some(signature) = self.grammar.signature {
            if self
                .rest()
                .starts_with(signature)
            {
                trace!("skipping file signature");
                self.skip_line();
            }
        }
    }

    /// Advance over whitespace and line comments.
    fn trim_whitespace(&mut self) {
        loop {
            match self.current() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some(_) => match self.grammar.line_comment {
                    Some(marker)
                        if self
                            .rest()
                            .starts_with(marker) =>
                    {
                        self.skip_line();
                    }
                    _ => return,
                },
                None => return,
            }
        }
    }

    fn is_delimiter(&self, c: char) -> bool {
        c.is_whitespace()
            || c == self.grammar.block_open
            || c == self.grammar.block_close
            || c == self.grammar.quote
    }

    pub fn next_token(&mut self) -> Result<Token, ParsingError> {
        if !self.started {
            self.skip_preamble();
        }

        loop {
            self.trim_whitespace();

            let position = self.position;
            let c = match self.current() {
                Some(c) => c,
                None => return Ok(Token::new(TokenKind::EndOfInput, "", position)),
            };

            if c == self.grammar.block_open {
                self.bump();
                return Ok(Token::new(TokenKind::BlockOpen, c, position));
            }
            if c == self.grammar.block_close {
                self.bump();
                return Ok(Token::new(TokenKind::BlockClose, c, position));
            }
            if c == self.grammar.quote {
                let text = self.read_quoted()?;
                return Ok(Token::new(TokenKind::String, text, position));
            }

            let word = self.read_word();

            if self.is_comment_marker(&word) {
                trace!(?position, "discarding comment '{}'", word);
                self.discard_comment_block()?;
                continue;
            }

            let kind = if is_numeric_literal(&word) {
                TokenKind::Number
            } else {
                TokenKind::Word
            };
            return Ok(Token::new(kind, word, position));
        }
    }

    fn read_word(&mut self) -> String {
        let start = self.position.offset;
        while let Some(c) = self.current() {
            if self.is_delimiter(c) {
                break;
            }
            self.bump();
        }
        self.source[start..self.position.offset].to_string()
    }

    /// Read a quoted string, along with any further quoted strings joined to
    /// it by the concatenation operator.
    fn read_quoted(&mut self) -> Result<String, ParsingError> {
        let mut text = self.read_one_quoted()?;

        loop {
            let saved = self.position;
            self.trim_whitespace();
            if self.current() != Some(self.grammar.concatenate) {
                self.position = saved;
                break;
            }
            self.bump();
            self.trim_whitespace();
            if self.current() != Some(self.grammar.quote) {
                // not a concatenation after all; leave the operator in place
                self.position = saved;
                break;
            }
            text.push_str(&self.read_one_quoted()?);
        }

        Ok(text)
    }

    fn read_one_quoted(&mut self) -> Result<String, ParsingError> {
        let opening = self.position;
        self.bump();

        let mut text = String::new();
        loop {
            let c = match self.bump() {
                Some(c) => c,
                None => return Err(ParsingError::UnterminatedQuotedString(opening)),
            };

            if c == self.grammar.quote {
                return Ok(text);
            }

            if c == self.grammar.escape {
                match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => return Err(ParsingError::UnterminatedQuotedString(opening)),
                }
            } else {
                text.push(c);
            }
        }
    }

    fn is_comment_marker(&self, word: &str) -> bool {
        if let Some(first) = word.chars().next() {
            if self
                .grammar
                .comment_prefixes
                .contains(&first)
            {
                return true;
            }
        }
        self.grammar
            .comment_keywords
            .iter()
            .any(|keyword| word.eq_ignore_ascii_case(keyword))
    }

    /// Having consumed a comment marker, discard the block which follows it,
    /// if there is one.
    fn discard_comment_block(&mut self) -> Result<(), ParsingError> {
        self.trim_whitespace();

        let opening = self.position;
        if self.current() != Some(self.grammar.block_open) {
            return Ok(());
        }
        self.bump();

        let mut depth = 0;
        loop {
            self.trim_whitespace();
            let c = match self.current() {
                Some(c) => c,
                None => {
                    return Err(ParsingError::UnexpectedEndOfInput(
                        self.position,
                        Some(opening),
                    ))
                }
            };

            if c == self.grammar.quote {
                self.read_one_quoted()?;
            } else if c == self.grammar.block_open {
                self.bump();
                depth += 1;
            } else if c == self.grammar.block_close {
                self.bump();
                if depth == 0 {
                    return Ok(());
                }
                depth -= 1;
            } else {
                self.read_word();
            }
        }
    }
}

/// Whether the text is an optionally signed integer or decimal literal with
/// an optional exponent. Narrower than `str::parse::<f64>`, which also
/// accepts "inf" and "NaN".
pub fn is_numeric_literal(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == start {
            return false;
        }
    }

    i == bytes.len()
}
