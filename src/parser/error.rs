use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, ParseError>;

/// A failed parse: the furthest position the parser reached (1-based) plus
/// the source split into lines for error display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub lines: Vec<String>,
    pub message: String,
}

impl ParseError {
    pub fn new<S: Into<String>>(line: usize, column: usize, source: &str, message: S) -> ParseError {
        ParseError {
            line,
            column,
            lines: source.lines().map(String::from).collect(),
            message: message.into(),
        }
    }

    /// The offending source line, if the position is in range.
    pub fn context_line(&self) -> Option<&str> {
        self.lines.get(self.line.wrapping_sub(1)).map(String::as_str)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parse error: line {}, column {}: {}",
            self.line, self.column, self.message
        )
    }
}

impl Error for ParseError {}
