use thiserror::Error;

/// Errors produced by foundation type operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("unknown serialized type code: {0}")]
    UnknownTypeCode(u16),

    #[error("invalid path element: {0}")]
    InvalidPathElement(String),
}
