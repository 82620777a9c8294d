use std::fmt;

/// Errors produced by the sum-rope core.
#[derive(Debug, Clone, PartialEq)]
pub enum RopeError {
    /// An index or offset fell outside the valid interval for the operation.
    OutOfRange {
        what: &'static str,
        value: usize,
        bound: usize,
    },
    /// An argument was structurally invalid (negative count, bad dimension, ...).
    InvalidArgument(String),
    /// Text handed to `RLEGroup` construction was not valid UTF-8.
    InvalidEncoding(std::str::Utf8Error),
}

impl fmt::Display for RopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RopeError::OutOfRange { what, value, bound } => {
                write!(f, "{what} out of range: {value} (bound {bound})")
            }
            RopeError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            RopeError::InvalidEncoding(e) => write!(f, "invalid UTF-8: {e}"),
        }
    }
}

impl std::error::Error for RopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RopeError::InvalidEncoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::str::Utf8Error> for RopeError {
    fn from(e: std::str::Utf8Error) -> Self {
        RopeError::InvalidEncoding(e)
    }
}

pub type RopeResult<T> = Result<T, RopeError>;

pub(crate) fn out_of_range(what: &'static str, value: usize, bound: usize) -> RopeError {
    RopeError::OutOfRange { what, value, bound }
}
