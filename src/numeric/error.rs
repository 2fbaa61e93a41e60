use std::error::Error;
use std::fmt;

/// Failure conditions of the numeric tower. The evaluator wraps these with
/// the operator and operand renderings before they surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericError {
    Overflow,
    DivideByZero,
    Uncertainty,
    Unsupported(&'static str),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::Overflow => write!(f, "arithmetic overflow"),
            NumericError::DivideByZero => write!(f, "division by zero"),
            NumericError::Uncertainty => write!(f, "indeterminate form"),
            NumericError::Unsupported(what) => write!(f, "unsupported operation: {}", what),
        }
    }
}

impl Error for NumericError {}
