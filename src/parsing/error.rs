use super::lexer::Position;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    UnterminatedQuotedString(Position),
    UnbalancedBlock(Position),
    MalformedNumber(Position, String),
    UnexpectedEndOfInput(Position, Option<Position>),
    Expected(Position, String, String),
    IncludeFailed(Position, String, String),
}

impl ParsingError {
    pub fn position(&self) -> Position {
        match self {
            ParsingError::UnterminatedQuotedString(position) => *position,
            ParsingError::UnbalancedBlock(position) => *position,
            ParsingError::MalformedNumber(position, _) => *position,
            ParsingError::UnexpectedEndOfInput(position, _) => *position,
            ParsingError::Expected(position, _, _) => *position,
            ParsingError::IncludeFailed(position, _, _) => *position,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::UnterminatedQuotedString(_) => "unterminated quoted string".to_string(),
            ParsingError::UnbalancedBlock(_) => "unbalanced ')' with no matching '('".to_string(),
            ParsingError::MalformedNumber(_, text) => format!("malformed number '{}'", text),
            ParsingError::UnexpectedEndOfInput(_, Some(_)) => {
                "expected closing ')' but found end of file".to_string()
            }
            ParsingError::UnexpectedEndOfInput(_, None) => "unexpected end of file".to_string(),
            ParsingError::Expected(_, expected, found) => {
                format!("expected {} but found {}", expected, found)
            }
            ParsingError::IncludeFailed(_, path, _) => format!("unable to include \"{}\"", path),
        }
    }

    /// Longer explanation of the problem, suitable for showing beneath the
    /// offending source line.
    pub fn details(&self) -> String {
        match self {
            ParsingError::UnterminatedQuotedString(_) => r#"
A string was opened with a '"' here but the file ended before the closing
quote was found. Quote characters within a string must be escaped as \".
            "#
            .trim_ascii()
            .to_string(),
            ParsingError::UnbalancedBlock(_) => r#"
Every ')' must close a block opened by an earlier '('. This one doesn't
correspond to any open block; check for an extra ')' or a missing '('.
            "#
            .trim_ascii()
            .to_string(),
            ParsingError::MalformedNumber(_, text) => format!(
                "A numeric value was expected here, but '{}' is not a valid integer or decimal number.",
                text
            ),
            ParsingError::UnexpectedEndOfInput(_, Some(opened)) => format!(
                "The block opened at line {}, column {} was never closed.",
                opened.line, opened.column
            ),
            ParsingError::UnexpectedEndOfInput(_, None) => {
                "The file ended before the reader expected it to.".to_string()
            }
            ParsingError::Expected(_, expected, _) => format!(
                "The reader was looking for {} but found something else.",
                expected
            ),
            ParsingError::IncludeFailed(_, _, reason) => reason.to_string(),
        }
    }
}
