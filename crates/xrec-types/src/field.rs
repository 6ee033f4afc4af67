use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Wire type tag of a field.
///
/// The numeric codes are part of the wire format: they appear in every field
/// header and define the primary key of the canonical field order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u16)]
pub enum SerializedTypeId {
    NotPresent = 0,
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    Object = 14,
    Array = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

impl SerializedTypeId {
    /// All type ids that can carry a value on the wire.
    pub const VALUE_KINDS: [SerializedTypeId; 14] = [
        Self::UInt16,
        Self::UInt32,
        Self::UInt64,
        Self::Hash128,
        Self::Hash256,
        Self::Amount,
        Self::Blob,
        Self::AccountId,
        Self::Object,
        Self::Array,
        Self::UInt8,
        Self::Hash160,
        Self::PathSet,
        Self::Vector256,
    ];

    /// The numeric wire code.
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Map a wire code back to a type id.
    pub fn from_code(code: u16) -> Result<Self, TypeError> {
        Ok(match code {
            0 => Self::NotPresent,
            1 => Self::UInt16,
            2 => Self::UInt32,
            3 => Self::UInt64,
            4 => Self::Hash128,
            5 => Self::Hash256,
            6 => Self::Amount,
            7 => Self::Blob,
            8 => Self::AccountId,
            14 => Self::Object,
            15 => Self::Array,
            16 => Self::UInt8,
            17 => Self::Hash160,
            18 => Self::PathSet,
            19 => Self::Vector256,
            other => return Err(TypeError::UnknownTypeCode(other)),
        })
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::NotPresent => "NotPresent",
            Self::UInt16 => "UInt16",
            Self::UInt32 => "UInt32",
            Self::UInt64 => "UInt64",
            Self::Hash128 => "Hash128",
            Self::Hash256 => "Hash256",
            Self::Amount => "Amount",
            Self::Blob => "Blob",
            Self::AccountId => "AccountID",
            Self::Object => "Object",
            Self::Array => "Array",
            Self::UInt8 => "UInt8",
            Self::Hash160 => "Hash160",
            Self::PathSet => "PathSet",
            Self::Vector256 => "Vector256",
        }
    }

    /// Case-insensitive lookup by [`name`](Self::name).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::VALUE_KINDS
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for SerializedTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a schema field: a wire type tag plus an ordinal.
///
/// Only `(type, ordinal)` take part in equality, hashing and ordering. The
/// name and the signing flag are descriptive metadata carried along so that
/// a `FieldId` alone is enough to render and serialize a field.
#[derive(Clone, Copy)]
pub struct FieldId {
    kind: SerializedTypeId,
    ordinal: u8,
    name: &'static str,
    signing: bool,
}

impl FieldId {
    /// Name used for records that are not stored under any field.
    pub const GENERIC: FieldId = FieldId::new(SerializedTypeId::NotPresent, 0, "Generic");

    /// A field that is part of the signing payload.
    pub const fn new(kind: SerializedTypeId, ordinal: u8, name: &'static str) -> Self {
        Self {
            kind,
            ordinal,
            name,
            signing: true,
        }
    }

    /// A field excluded from the signing payload (signatures and the like).
    pub const fn non_signing(kind: SerializedTypeId, ordinal: u8, name: &'static str) -> Self {
        Self {
            kind,
            ordinal,
            name,
            signing: false,
        }
    }

    /// The wire type tag.
    pub const fn kind(&self) -> SerializedTypeId {
        self.kind
    }

    /// The ordinal within the type.
    pub const fn ordinal(&self) -> u8 {
        self.ordinal
    }

    /// The registered field name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the field is included in the signing payload.
    pub const fn is_signing(&self) -> bool {
        self.signing
    }

    /// Packed `(type << 16) | ordinal`, usable as a compact map key.
    pub const fn code(&self) -> u32 {
        ((self.kind as u32) << 16) | self.ordinal as u32
    }

    /// Returns `true` for [`FieldId::GENERIC`] and other untyped names.
    pub fn is_generic(&self) -> bool {
        self.kind == SerializedTypeId::NotPresent
    }
}

impl PartialEq for FieldId {
    fn eq(&self, other: &Self) -> bool {
        self.code() == other.code()
    }
}

impl Eq for FieldId {}

impl Hash for FieldId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code().hash(state);
    }
}

impl PartialOrd for FieldId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(&other.code())
    }
}

impl fmt::Debug for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldId({}: {}/{})", self.name, self.kind, self.ordinal)
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_ignores_metadata() {
        let a = FieldId::new(SerializedTypeId::UInt32, 4, "Sequence");
        let b = FieldId::non_signing(SerializedTypeId::UInt32, 4, "Other");
        assert_eq!(a, b);
    }

    #[test]
    fn order_is_type_then_ordinal() {
        let u16_high = FieldId::new(SerializedTypeId::UInt16, 200, "A");
        let u32_low = FieldId::new(SerializedTypeId::UInt32, 1, "B");
        let u32_high = FieldId::new(SerializedTypeId::UInt32, 2, "C");
        assert!(u16_high < u32_low);
        assert!(u32_low < u32_high);
    }

    #[test]
    fn uint8_sorts_after_array() {
        let array = FieldId::new(SerializedTypeId::Array, 9, "Memos");
        let uint8 = FieldId::new(SerializedTypeId::UInt8, 1, "CloseResolution");
        assert!(array < uint8);
    }

    #[test]
    fn type_code_roundtrip() {
        for kind in SerializedTypeId::VALUE_KINDS {
            assert_eq!(SerializedTypeId::from_code(kind.code()).unwrap(), kind);
        }
        assert_eq!(
            SerializedTypeId::from_code(9),
            Err(TypeError::UnknownTypeCode(9))
        );
    }

    #[test]
    fn type_lookup_by_name() {
        assert_eq!(SerializedTypeId::from_name("uint32"), Some(SerializedTypeId::UInt32));
        assert_eq!(SerializedTypeId::from_name("AccountID"), Some(SerializedTypeId::AccountId));
        assert_eq!(SerializedTypeId::from_name("nope"), None);
    }

    #[test]
    fn signing_flag() {
        assert!(FieldId::new(SerializedTypeId::Blob, 3, "SigningPubKey").is_signing());
        assert!(!FieldId::non_signing(SerializedTypeId::Blob, 4, "TxnSignature").is_signing());
    }
}
