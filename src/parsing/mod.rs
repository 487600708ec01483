//! reader for STF descriptor files

use std::path::Path;
use tracing::debug;

use crate::language::LoadingError;

mod error;
mod lexer;
mod options;
mod reader;

// Re-export all public symbols
pub use error::ParsingError;
pub use lexer::{is_numeric_literal, Position, Token, TokenKind};
pub use options::{Grammar, Options};
pub use reader::{Handler, Handlers, Reader};

/// Read a file and return an owned String, which the Reader then takes
/// ownership of for the duration of the parse.
pub fn load(filename: &Path) -> Result<String, LoadingError> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            Err(LoadingError::from_io(filename, &error))
        }
    }
}
