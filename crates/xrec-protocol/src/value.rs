use std::fmt;

use xrec_types::{
    AccountId, Amount, Hash128, Hash160, Hash256, PathSet, SerializedTypeId, Vector256,
};

use crate::array::RecordArray;
use crate::record::Record;

/// A single field value, tagged with its wire kind.
///
/// `NotPresent` marks a slot that is declared but holds nothing.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    NotPresent,
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Hash128(Hash128),
    Hash160(Hash160),
    Hash256(Hash256),
    Blob(Vec<u8>),
    Account(AccountId),
    Amount(Amount),
    PathSet(PathSet),
    Vector256(Vector256),
    Object(Record),
    Array(RecordArray),
}

impl Value {
    /// Wire kind of this value.
    pub fn kind(&self) -> SerializedTypeId {
        match self {
            Self::NotPresent => SerializedTypeId::NotPresent,
            Self::UInt8(_) => SerializedTypeId::UInt8,
            Self::UInt16(_) => SerializedTypeId::UInt16,
            Self::UInt32(_) => SerializedTypeId::UInt32,
            Self::UInt64(_) => SerializedTypeId::UInt64,
            Self::Hash128(_) => SerializedTypeId::Hash128,
            Self::Hash160(_) => SerializedTypeId::Hash160,
            Self::Hash256(_) => SerializedTypeId::Hash256,
            Self::Blob(_) => SerializedTypeId::Blob,
            Self::Account(_) => SerializedTypeId::AccountId,
            Self::Amount(_) => SerializedTypeId::Amount,
            Self::PathSet(_) => SerializedTypeId::PathSet,
            Self::Vector256(_) => SerializedTypeId::Vector256,
            Self::Object(_) => SerializedTypeId::Object,
            Self::Array(_) => SerializedTypeId::Array,
        }
    }

    /// Default value of a kind. `NotPresent` maps to itself.
    pub fn default_for(kind: SerializedTypeId) -> Self {
        match kind {
            SerializedTypeId::NotPresent => Self::NotPresent,
            SerializedTypeId::UInt8 => Self::UInt8(0),
            SerializedTypeId::UInt16 => Self::UInt16(0),
            SerializedTypeId::UInt32 => Self::UInt32(0),
            SerializedTypeId::UInt64 => Self::UInt64(0),
            SerializedTypeId::Hash128 => Self::Hash128(Hash128::zero()),
            SerializedTypeId::Hash160 => Self::Hash160(Hash160::zero()),
            SerializedTypeId::Hash256 => Self::Hash256(Hash256::zero()),
            SerializedTypeId::Blob => Self::Blob(Vec::new()),
            SerializedTypeId::AccountId => Self::Account(AccountId::zero()),
            SerializedTypeId::Amount => Self::Amount(Amount::default()),
            SerializedTypeId::PathSet => Self::PathSet(PathSet::new()),
            SerializedTypeId::Vector256 => Self::Vector256(Vector256::new()),
            SerializedTypeId::Object => Self::Object(Record::default()),
            SerializedTypeId::Array => Self::Array(RecordArray::new()),
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Self::NotPresent)
    }

    /// Whether this value equals the default of its kind.
    pub fn is_default(&self) -> bool {
        match self {
            Self::NotPresent => true,
            Self::UInt8(v) => *v == 0,
            Self::UInt16(v) => *v == 0,
            Self::UInt32(v) => *v == 0,
            Self::UInt64(v) => *v == 0,
            Self::Hash128(h) => h.is_zero(),
            Self::Hash160(h) => h.is_zero(),
            Self::Hash256(h) => h.is_zero(),
            Self::Blob(b) => b.is_empty(),
            Self::Account(a) => a.is_zero(),
            Self::Amount(a) => *a == Amount::default(),
            Self::PathSet(p) => p.is_empty(),
            Self::Vector256(v) => v.is_empty(),
            Self::Object(r) => r.present_fields().next().is_none(),
            Self::Array(a) => a.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPresent => Ok(()),
            Self::UInt8(v) => write!(f, "{v}"),
            Self::UInt16(v) => write!(f, "{v}"),
            Self::UInt32(v) => write!(f, "{v}"),
            Self::UInt64(v) => write!(f, "{v:016X}"),
            Self::Hash128(h) => write!(f, "{h}"),
            Self::Hash160(h) => write!(f, "{h}"),
            Self::Hash256(h) => write!(f, "{h}"),
            Self::Blob(b) => f.write_str(&hex::encode_upper(b)),
            Self::Account(a) => write!(f, "{a}"),
            Self::Amount(a) => write!(f, "{a}"),
            Self::PathSet(p) => write!(f, "{p}"),
            Self::Vector256(v) => write!(f, "{v}"),
            Self::Object(r) => write!(f, "{r}"),
            Self::Array(a) => write!(f, "{a}"),
        }
    }
}

/// A Rust type that is the payload of exactly one value kind.
///
/// Typed field handles use this to read and write slots without the caller
/// matching on [`Value`].
pub trait FieldType: Clone + PartialEq + Default + fmt::Debug + Sized {
    const KIND: SerializedTypeId;

    fn from_value(value: &Value) -> Option<&Self>;

    fn from_value_mut(value: &mut Value) -> Option<&mut Self>;

    fn into_value(self) -> Value;
}

macro_rules! field_type {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl FieldType for $ty {
            const KIND: SerializedTypeId = SerializedTypeId::$kind;

            fn from_value(value: &Value) -> Option<&Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_value_mut(value: &mut Value) -> Option<&mut Self> {
                match value {
                    Value::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_value(self) -> Value {
                Value::$variant(self)
            }
        }

        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }
    };
}

field_type!(u8, UInt8, UInt8);
field_type!(u16, UInt16, UInt16);
field_type!(u32, UInt32, UInt32);
field_type!(u64, UInt64, UInt64);
field_type!(Hash128, Hash128, Hash128);
field_type!(Hash160, Hash160, Hash160);
field_type!(Hash256, Hash256, Hash256);
field_type!(Vec<u8>, Blob, Blob);
field_type!(AccountId, Account, AccountId);
field_type!(Amount, Amount, Amount);
field_type!(PathSet, PathSet, PathSet);
field_type!(Vector256, Vector256, Vector256);
field_type!(Record, Object, Object);
field_type!(RecordArray, Array, Array);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_default_values() {
        for kind in SerializedTypeId::VALUE_KINDS {
            let v = Value::default_for(kind);
            assert_eq!(v.kind(), kind);
            assert!(v.is_default(), "{kind} default not recognised");
            assert!(v.is_present());
        }
        assert!(!Value::default_for(SerializedTypeId::NotPresent).is_present());
    }

    #[test]
    fn non_default_values() {
        assert!(!Value::UInt32(7).is_default());
        assert!(!Value::Blob(vec![1]).is_default());
        assert!(!Value::Amount(Amount::native(1).unwrap()).is_default());
        assert!(!Value::Hash256(Hash256::from_array([1; 32])).is_default());
    }

    #[test]
    fn typed_extraction() {
        let v: Value = 42u32.into();
        assert_eq!(u32::from_value(&v), Some(&42));
        assert_eq!(u16::from_value(&v), None);

        let mut v = Value::Blob(vec![1, 2]);
        Vec::<u8>::from_value_mut(&mut v).unwrap().push(3);
        assert_eq!(v, Value::Blob(vec![1, 2, 3]));
    }

    #[test]
    fn display_renders_hex_for_binary_kinds() {
        assert_eq!(Value::Blob(vec![0xAB, 0x01]).to_string(), "AB01");
        assert_eq!(Value::UInt16(5).to_string(), "5");
        assert_eq!(Value::UInt64(255).to_string(), "00000000000000FF");
        assert_eq!(Value::NotPresent.to_string(), "");
    }
}
