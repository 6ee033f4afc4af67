use thiserror::Error;
use xrec_types::TypeError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("output capacity exceeded (limit {limit} bytes)")]
    CapacityExceeded { limit: usize },

    #[error("variable-length field too long: {0} bytes")]
    VlTooLong(usize),

    #[error("value cannot be encoded: {0}")]
    Unencodable(String),

    #[error("invalid value: {0}")]
    InvalidValue(#[from] TypeError),
}

pub type CodecResult<T> = Result<T, CodecError>;
