use thiserror::Error;
use xrec_codec::CodecError;
use xrec_crypto::SignatureError;
use xrec_types::SerializedTypeId;

/// Faults raised by record operations.
///
/// All of them are local programming or data faults; none is retryable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("field '{field}' is not declared by the bound template")]
    FieldNotDeclared { field: &'static str },

    #[error("field '{field}' is missing")]
    FieldMissing { field: &'static str },

    #[error("field '{field}' holds {actual}, expected {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: SerializedTypeId,
        actual: SerializedTypeId,
    },

    #[error("template violation on field '{field}': {reason}")]
    TemplateViolation { field: &'static str, reason: String },

    #[error("decode truncated: needed {needed} bytes, {remaining} remaining")]
    DecodeTruncated { needed: usize, remaining: usize },

    #[error("decode malformed: {0}")]
    DecodeMalformed(String),

    #[error("encode failed: {0}")]
    Encode(CodecError),

    #[error("signature error: {0}")]
    Signature(#[from] SignatureError),
}

impl RecordError {
    pub(crate) fn template(field: &'static str, reason: impl Into<String>) -> Self {
        Self::TemplateViolation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<CodecError> for RecordError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Truncated { needed, remaining } => {
                Self::DecodeTruncated { needed, remaining }
            }
            CodecError::Malformed(reason) => Self::DecodeMalformed(reason),
            CodecError::InvalidValue(e) => Self::DecodeMalformed(e.to_string()),
            e @ (CodecError::CapacityExceeded { .. }
            | CodecError::VlTooLong(_)
            | CodecError::Unencodable(_)) => Self::Encode(e),
        }
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Faults raised while building a template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("field '{0}' declared twice")]
    DuplicateField(&'static str),

    #[error("field '{0}' declared with the invalid style")]
    InvalidStyle(&'static str),

    #[error("field '{0}' has no wire type")]
    UntypedField(&'static str),

    #[error("field '{0}' is not in the field registry")]
    UnregisteredField(&'static str),
}
