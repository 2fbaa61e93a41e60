use crate::config::ConfigError;
use crate::interpreter::RuntimeError;
use crate::parser::ParseError;

use std::error::Error;
use std::fmt;

pub type Result<T> = std::result::Result<T, LangError>;

/// The crate-level error sum. The process boundary is the only layer meant
/// to match on this broadly and map kinds to exit codes.
#[derive(Debug)]
pub enum LangError {
    Parse(ParseError),
    Runtime(RuntimeError),
    Config(ConfigError),
    Cancelled,
}

impl fmt::Display for LangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LangError::Parse(error) => write!(f, "{}", error),
            LangError::Runtime(error) => write!(f, "runtime error: {}", error),
            LangError::Config(error) => write!(f, "{}", error),
            LangError::Cancelled => write!(f, "cancelled before evaluation started"),
        }
    }
}

impl Error for LangError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LangError::Parse(error) => Some(error),
            LangError::Runtime(error) => Some(error),
            LangError::Config(error) => Some(error),
            LangError::Cancelled => None,
        }
    }
}

impl From<ParseError> for LangError {
    fn from(error: ParseError) -> Self {
        LangError::Parse(error)
    }
}

impl From<RuntimeError> for LangError {
    fn from(error: RuntimeError) -> Self {
        LangError::Runtime(error)
    }
}

impl From<ConfigError> for LangError {
    fn from(error: ConfigError) -> Self {
        LangError::Config(error)
    }
}
