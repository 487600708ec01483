//! Block descent over the token stream, dispatching keywords to handlers

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use super::error::ParsingError;
use super::lexer::{Lexer, Position, Token, TokenKind};
use super::options::Options;
use crate::error::StfError;
use crate::language::LoadingError;

/// Nesting limit for include directives, which also stops runaway
/// recursion if a file manages to include itself by another name.
const MAX_INCLUDE_DEPTH: usize = 16;

pub type Handler<'h> = Box<dyn FnMut(&mut Reader) -> Result<(), ParsingError> + 'h>;

/// A dispatch table mapping token names to the action to be taken when that
/// token is encountered. Names are conventionally given in lowercase;
/// whether matching ignores case is a property of the Reader.
#[derive(Default)]
pub struct Handlers<'h> {
    entries: Vec<(String, Handler<'h>)>,
}

impl<'h> Handlers<'h> {
    pub fn new() -> Handlers<'h> {
        Handlers {
            entries: Vec::new(),
        }
    }

    /// Register an action for the given token name. Where more than one
    /// registered name matches a token, the most recent registration wins.
    pub fn on<F>(mut self, name: &str, action: F) -> Handlers<'h>
    where
        F: FnMut(&mut Reader) -> Result<(), ParsingError> + 'h,
    {
        self.entries
            .retain(|(existing, _)| existing != name);
        self.entries
            .push((name.to_string(), Box::new(action)));
        self
    }

    pub fn len(&self) -> usize {
        self.entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .is_empty()
    }

    fn find(&mut self, name: &str, options: &Options) -> Option<&mut Handler<'h>> {
        self.entries
            .iter_mut()
            .rev()
            .find(|(key, _)| options.matches(name, key))
            .map(|(_, handler)| handler)
    }
}

#[derive(Debug)]
struct Source {
    filename: PathBuf,
    lexer: Lexer,
    /// Block depth of the reader when this file was spliced in.
    depth: usize,
}

/// Streaming reader over one descriptor file (and any files it includes).
/// There is no parse tree: blocks exist only as the nesting of calls from
/// handlers back into the reader.
#[derive(Debug)]
pub struct Reader {
    current: Source,
    suspended: Vec<Source>,
    lookahead: Option<Token>,
    options: Options,
    depth: usize,
}

impl Reader {
    pub fn from_str(filename: impl Into<PathBuf>, content: &str, options: Options) -> Reader {
        Reader::from_string(filename.into(), content.to_string(), options)
    }

    pub fn from_reader(
        filename: impl Into<PathBuf>,
        mut input: impl Read,
        options: Options,
    ) -> Result<Reader, LoadingError> {
        let filename = filename.into();
        let mut content = String::new();
        if let Err(error) = input.read_to_string(&mut content) {
            debug!(?error);
            return Err(LoadingError::from_io(&filename, &error));
        }
        Ok(Reader::from_string(filename, content, options))
    }

    pub fn open(filename: &Path, options: Options) -> Result<Reader, LoadingError> {
        let content = super::load(filename)?;
        Ok(Reader::from_string(filename.to_path_buf(), content, options))
    }

    fn from_string(filename: PathBuf, content: String, options: Options) -> Reader {
        Reader {
            current: Source {
                filename,
                lexer: Lexer::new(content, &options),
                depth: 0,
            },
            suspended: Vec::new(),
            lookahead: None,
            options,
            depth: 0,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The file currently being read, which will be an included file while
    /// within one.
    pub fn filename(&self) -> &Path {
        &self.current.filename
    }

    /// Resolve a parsing error against the file being read.
    pub fn describe(&self, error: ParsingError) -> StfError {
        let line = error
            .position()
            .line;
        StfError::new(
            error,
            &self.current.filename,
            self.current
                .lexer
                .line_text(line),
        )
    }

    // Token level access

    pub fn peek_token(&mut self) -> Result<&Token, ParsingError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.fetch()?,
        };
        Ok(self.lookahead.insert(token))
    }

    pub fn next_token(&mut self) -> Result<Token, ParsingError> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.fetch()?,
        };

        match token.kind {
            TokenKind::BlockOpen => self.depth += 1,
            TokenKind::BlockClose => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }

        Ok(token)
    }

    fn peek_kind(&mut self) -> Result<TokenKind, ParsingError> {
        Ok(self
            .peek_token()?
            .kind)
    }

    /// Pull the next token from the lexers, splicing in included files and
    /// returning to the including file when an included one is exhausted.
    fn fetch(&mut self) -> Result<Token, ParsingError> {
        loop {
            let token = self
                .current
                .lexer
                .next_token()?;

            match token.kind {
                TokenKind::EndOfInput => {
                    if self.depth > self.current.depth {
                        // a block opened in this file is still open; report
                        // it here rather than in the including file
                        return Ok(token);
                    }
                    if let Some(outer) = self
                        .suspended
                        .pop()
                    {
                        let inner = std::mem::replace(&mut self.current, outer);
                        debug!("Finished include {}", inner.filename.display());
                        continue;
                    }
                    return Ok(token);
                }
                TokenKind::Word
                    if self.options.includes
                        && self
                            .options
                            .matches(&token.text, self.options.grammar.include_keyword) =>
                {
                    self.include(token.position)?;
                }
                _ => return Ok(token),
            }
        }
    }

    fn include(&mut self, position: Position) -> Result<(), ParsingError> {
        let lexer = &mut self
            .current
            .lexer;

        let open = lexer.next_token()?;
        if open.kind != TokenKind::BlockOpen {
            return Err(ParsingError::Expected(
                open.position,
                format!("'{}'", self.options.grammar.block_open),
                open.describe(),
            ));
        }

        let target = lexer.next_token()?;
        if !target.is_scalar() {
            return Err(ParsingError::Expected(
                target.position,
                "the name of a file to include".to_string(),
                target.describe(),
            ));
        }

        let close = lexer.next_token()?;
        if close.kind != TokenKind::BlockClose {
            return Err(ParsingError::Expected(
                close.position,
                format!("'{}'", self.options.grammar.block_close),
                close.describe(),
            ));
        }

        let path = match self
            .current
            .filename
            .parent()
        {
            Some(directory) => directory.join(&target.text),
            None => PathBuf::from(&target.text),
        };

        if self.suspended.len() >= MAX_INCLUDE_DEPTH {
            return Err(ParsingError::IncludeFailed(
                position,
                target.text,
                format!("Includes are nested more than {} deep.", MAX_INCLUDE_DEPTH),
            ));
        }

        if path == self.current.filename
            || self
                .suspended
                .iter()
                .any(|source| source.filename == path)
        {
            return Err(ParsingError::IncludeFailed(
                position,
                target.text,
                "The file is already being read by an enclosing include.".to_string(),
            ));
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(error) => {
                debug!(?error);
                return Err(ParsingError::IncludeFailed(
                    position,
                    target.text,
                    format!("Failed reading {}: {}", path.display(), error.kind()),
                ));
            }
        };

        debug!("Including {}", path.display());

        let inner = Source {
            filename: path,
            lexer: Lexer::new(content, &self.options),
            depth: self.depth,
        };
        let outer = std::mem::replace(&mut self.current, inner);
        self.suspended
            .push(outer);

        Ok(())
    }

    // Block descent

    /// Process the whole input, dispatching each top level token through the
    /// given table. Unrecognized tokens, and any block following them, are
    /// skipped.
    pub fn process_file(&mut self, mut handlers: Handlers<'_>) -> Result<(), StfError> {
        debug!("Reading {}", self.filename().display());
        self.dispatch(&mut handlers, None)
            .map_err(|error| self.describe(error))
    }

    /// Process a nested block, which must be the next thing in the input,
    /// dispatching each token within it through the given table. Returns
    /// having consumed the block's closing delimiter.
    pub fn process_block(&mut self, mut handlers: Handlers<'_>) -> Result<(), ParsingError> {
        let opened = self.must_match_open()?;
        self.dispatch(&mut handlers, Some(opened))
    }

    fn dispatch(
        &mut self,
        handlers: &mut Handlers<'_>,
        opened: Option<Position>,
    ) -> Result<(), ParsingError> {
        loop {
            let token = self.next_token()?;

            match token.kind {
                TokenKind::EndOfInput => {
                    return match opened {
                        None => Ok(()),
                        Some(opened) => Err(ParsingError::UnexpectedEndOfInput(
                            token.position,
                            Some(opened),
                        )),
                    };
                }
                TokenKind::BlockClose => {
                    return match opened {
                        Some(_) => Ok(()),
                        None => Err(ParsingError::UnbalancedBlock(token.position)),
                    };
                }
                TokenKind::BlockOpen => {
                    trace!(position = ?token.position, "skipping anonymous block");
                    self.skip_to_close(token.position)?;
                }
                TokenKind::Word => match handlers.find(&token.text, &self.options) {
                    Some(handler) => {
                        let depth = self.depth;
                        trace!("Dispatching '{}'", token.text);
                        handler(self)?;
                        if cfg!(debug_assertions) && self.depth != depth {
                            warn!(
                                "Handler for '{}' at line {} left the reader at depth {} rather than {}",
                                token.text, token.position.line, self.depth, depth
                            );
                        }
                    }
                    None => {
                        trace!("Skipping unrecognized '{}'", token.text);
                        self.skip_block()?;
                    }
                },
                TokenKind::String | TokenKind::Number => {
                    self.skip_block()?;
                }
            }
        }
    }

    /// Consume the opening delimiter of a block, returning where it was.
    pub fn must_match_open(&mut self) -> Result<Position, ParsingError> {
        let token = self.next_token()?;
        match token.kind {
            TokenKind::BlockOpen => Ok(token.position),
            TokenKind::EndOfInput => Err(ParsingError::UnexpectedEndOfInput(token.position, None)),
            _ => Err(ParsingError::Expected(
                token.position,
                format!("'{}'", self.options.grammar.block_open),
                token.describe(),
            )),
        }
    }

    /// Whether the next token closes the current block (or there is nothing
    /// more to read).
    pub fn end_of_block(&mut self) -> Result<bool, ParsingError> {
        Ok(matches!(
            self.peek_kind()?,
            TokenKind::BlockClose | TokenKind::EndOfInput
        ))
    }

    /// If a block follows, consume all of it, including any blocks nested
    /// within it. Otherwise do nothing.
    pub fn skip_block(&mut self) -> Result<(), ParsingError> {
        if self.peek_kind()? == TokenKind::BlockOpen {
            let opened = self.must_match_open()?;
            self.skip_to_close(opened)?;
        }
        Ok(())
    }

    /// Consume everything up to and including the delimiter closing the
    /// block the reader is currently within.
    pub fn skip_rest_of_block(&mut self) -> Result<(), ParsingError> {
        let position = self
            .peek_token()?
            .position;
        self.skip_to_close(position)
    }

    fn skip_to_close(&mut self, opened: Position) -> Result<(), ParsingError> {
        let mut depth = 0;
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::BlockOpen => depth += 1,
                TokenKind::BlockClose => {
                    if depth == 0 {
                        return Ok(());
                    }
                    depth -= 1;
                }
                TokenKind::EndOfInput => {
                    return Err(ParsingError::UnexpectedEndOfInput(
                        token.position,
                        Some(opened),
                    ))
                }
                _ => {}
            }
        }
    }

    // Leaf values

    /// Read the next scalar value as text. The value may be bare, or wrapped
    /// in a block as in `name ( "value" )`; in the latter case the block is
    /// consumed through its closing delimiter and anything after the first
    /// item is ignored. An empty block, or no value at all, gives `default`.
    pub fn read_string(&mut self, default: &str) -> Result<String, ParsingError> {
        let value = self.read_scalar()?;
        Ok(value
            .map(|token| token.text)
            .unwrap_or_else(|| default.to_string()))
    }

    /// Read the next scalar value as a number, following the same rules as
    /// `read_string()`. Content which isn't a numeric literal is an error.
    pub fn read_number(&mut self, default: f64) -> Result<f64, ParsingError> {
        match self.read_scalar()? {
            Some(token) => parse_number(&token),
            None => Ok(default),
        }
    }

    /// Read the next scalar value as a whole number.
    pub fn read_integer(&mut self, default: i64) -> Result<i64, ParsingError> {
        match self.read_scalar()? {
            Some(token) => {
                if !super::lexer::is_numeric_literal(&token.text) {
                    return Err(ParsingError::MalformedNumber(
                        token.position,
                        token.text,
                    ));
                }
                token
                    .text
                    .parse::<i64>()
                    .map_err(|_| ParsingError::MalformedNumber(token.position, token.text.clone()))
            }
            None => Ok(default),
        }
    }

    /// Read the next scalar value as a flag. Accepts `true`, `false`, `1`,
    /// and `0`, ignoring case.
    pub fn read_bool(&mut self, default: bool) -> Result<bool, ParsingError> {
        match self.read_scalar()? {
            Some(token) => {
                let text = token.text.as_str();
                if text.eq_ignore_ascii_case("true") || text == "1" {
                    Ok(true)
                } else if text.eq_ignore_ascii_case("false") || text == "0" {
                    Ok(false)
                } else {
                    Err(ParsingError::Expected(
                        token.position,
                        "true or false".to_string(),
                        token.describe(),
                    ))
                }
            }
            None => Ok(default),
        }
    }

    /// Read every item in the following block as a number, as in
    /// `size ( 3.2 4 1.5 )`.
    pub fn read_numbers(&mut self) -> Result<Vec<f64>, ParsingError> {
        let opened = self.must_match_open()?;
        let mut values = Vec::new();
        loop {
            let token = self.next_token()?;
            match token.kind {
                TokenKind::BlockClose => return Ok(values),
                TokenKind::EndOfInput => {
                    return Err(ParsingError::UnexpectedEndOfInput(
                        token.position,
                        Some(opened),
                    ))
                }
                TokenKind::BlockOpen => {
                    return Err(ParsingError::Expected(
                        token.position,
                        "a number".to_string(),
                        token.describe(),
                    ))
                }
                _ => values.push(parse_number(&token)?),
            }
        }
    }

    /// Read the text of the next token, which must be a scalar.
    pub fn read_item(&mut self) -> Result<String, ParsingError> {
        let token = self.next_token()?;
        if token.is_scalar() {
            return Ok(token.text);
        }
        match token.kind {
            TokenKind::EndOfInput => Err(ParsingError::UnexpectedEndOfInput(token.position, None)),
            _ => Err(ParsingError::Expected(
                token.position,
                "a value".to_string(),
                token.describe(),
            )),
        }
    }

    /// Common handling of the forms a leaf value can take. Gives None if the
    /// slot is empty.
    fn read_scalar(&mut self) -> Result<Option<Token>, ParsingError> {
        match self.peek_kind()? {
            TokenKind::BlockOpen => {
                let opened = self.must_match_open()?;
                let token = self.next_token()?;
                match token.kind {
                    TokenKind::BlockClose => Ok(None),
                    TokenKind::EndOfInput => Err(ParsingError::UnexpectedEndOfInput(
                        token.position,
                        Some(opened),
                    )),
                    TokenKind::BlockOpen => {
                        // not a scalar; discard the nested block and whatever
                        // else remains
                        self.skip_to_close(token.position)?;
                        self.skip_to_close(opened)?;
                        Ok(None)
                    }
                    _ => {
                        if !self.end_of_block()? {
                            debug!(
                                "Ignoring extra items after value at line {}",
                                token.position.line
                            );
                        }
                        self.skip_to_close(opened)?;
                        Ok(Some(token))
                    }
                }
            }
            TokenKind::BlockClose | TokenKind::EndOfInput => Ok(None),
            _ => Ok(Some(self.next_token()?)),
        }
    }
}

fn parse_number(token: &Token) -> Result<f64, ParsingError> {
    if !super::lexer::is_numeric_literal(&token.text) {
        return Err(ParsingError::MalformedNumber(
            token.position,
            token.text.clone(),
        ));
    }
    token
        .text
        .parse::<f64>()
        .map_err(|_| ParsingError::MalformedNumber(token.position, token.text.clone()))
}
