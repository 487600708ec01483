use std::{
    fmt,
    path::{Path, PathBuf},
};

use owo_colors::OwoColorize;

use crate::parsing::ParsingError;

/// A parsing failure resolved against the file it occurred in, carrying
/// everything needed to show it to a human.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StfError {
    pub problem: String,
    pub details: String,
    pub filename: PathBuf,
    pub code: String,
    pub line: usize,
    pub column: usize,
    pub error: ParsingError,
}

impl StfError {
    pub fn new(error: ParsingError, filename: &Path, code: &str) -> StfError {
        let position = error.position();
        StfError {
            problem: error.message(),
            details: error.details(),
            filename: filename.to_path_buf(),
            code: code.to_string(),
            line: position.line,
            column: position.column,
            error,
        }
    }
}

// Verbose detailed explanation
impl StfError {
    pub fn full_details(&self) -> String {
        let line = self.line;
        let column = self.column;

        let width = line
            .to_string()
            .len();
        let width = 3.max(width);

        format!(
            r#"
{}: {}
{}:{}:{}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>column$}

{}
            "#,
            "error".bright_red(),
            self.problem
                .bold(),
            self.filename
                .to_string_lossy(),
            line,
            column,
            ' ',
            '|'.bright_blue(),
            line.bright_blue(),
            '|'.bright_blue(),
            self.code,
            ' ',
            '|'.bright_blue(),
            '^'.bright_red(),
            self.details
        )
        .trim_ascii()
        .to_string()
    }
}

// Concise version for internal use
impl fmt::Display for StfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error: {}:{}:{} {}",
            self.filename
                .to_string_lossy(),
            self.line,
            self.column,
            self.problem
        )
    }
}

impl std::error::Error for StfError {}
