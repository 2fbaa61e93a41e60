use crate::interpreter::object::Value;
use crate::numeric::{BaseError, NumericError};
use crate::parser::ParseError;
use crate::parser::ast::{BinaryOp, UnaryOp};
use crate::storage::StorageError;

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug)]
pub enum RuntimeError {
    UndefinedVariable(String),
    UndefinedFunction(String),
    StackUnderflow(&'static str),
    /// A numeric failure wrapped with the operator and operand renderings.
    Numeric {
        op: String,
        left: String,
        right: Option<String>,
        kind: NumericError,
    },
    Conversion(BaseError),
    FileNotFound(PathBuf),
    Io(io::Error),
    Parse(ParseError),
    Storage(StorageError),
    Terminated,
}

impl RuntimeError {
    pub fn binary_numeric(op: BinaryOp, left: &Value, right: &Value, kind: NumericError) -> RuntimeError {
        RuntimeError::Numeric {
            op: op.to_string(),
            left: left.to_string(),
            right: Some(right.to_string()),
            kind,
        }
    }

    pub fn unary_numeric(op: UnaryOp, operand: &Value, kind: NumericError) -> RuntimeError {
        RuntimeError::Numeric {
            op: op.to_string(),
            left: operand.to_string(),
            right: None,
            kind,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::UndefinedVariable(name) => {
                write!(f, "variable `{}` is not defined", name)
            }
            RuntimeError::UndefinedFunction(name) => {
                write!(f, "function `{}` is not defined", name)
            }
            RuntimeError::StackUnderflow(context) => {
                write!(f, "value stack underflow in {}", context)
            }
            RuntimeError::Numeric {
                op,
                left,
                right: Some(right),
                kind,
            } => {
                write!(
                    f,
                    "{} applying `{}` to `{}` and `{}`",
                    kind, op, left, right
                )
            }
            RuntimeError::Numeric {
                op,
                left,
                right: None,
                kind,
            } => write!(f, "{} applying `{}` to `{}`", kind, op, left),
            RuntimeError::Conversion(error) => write!(f, "numeral conversion failed: {}", error),
            RuntimeError::FileNotFound(path) => {
                write!(f, "file not found: {}", path.display())
            }
            RuntimeError::Io(error) => write!(f, "io error: {}", error),
            RuntimeError::Parse(error) => write!(f, "{}", error),
            RuntimeError::Storage(error) => write!(f, "storage error: {}", error),
            RuntimeError::Terminated => write!(f, "evaluation terminated by debugger"),
        }
    }
}

impl Error for RuntimeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RuntimeError::Io(error) => Some(error),
            RuntimeError::Parse(error) => Some(error),
            _ => None,
        }
    }
}

impl From<BaseError> for RuntimeError {
    fn from(error: BaseError) -> Self {
        RuntimeError::Conversion(error)
    }
}

impl From<io::Error> for RuntimeError {
    fn from(error: io::Error) -> Self {
        RuntimeError::Io(error)
    }
}

impl From<ParseError> for RuntimeError {
    fn from(error: ParseError) -> Self {
        RuntimeError::Parse(error)
    }
}

impl From<StorageError> for RuntimeError {
    fn from(error: StorageError) -> Self {
        RuntimeError::Storage(error)
    }
}
