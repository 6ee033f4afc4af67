//! Canonical binary encoding of records.
//!
//! Fields are written in ascending `(type code, ordinal)` order, each as a
//! field header followed by its payload. Nested objects end with
//! [`OBJECT_END_MARKER`], arrays with [`ARRAY_END_MARKER`].

use std::sync::Arc;

use tracing::{debug, trace};
use xrec_codec::{CodecError, SerialIter, Serializer, WireCodec};
use xrec_crypto::{Blake3Digest, Digest, HashPrefix};
use xrec_types::{
    AccountId, Amount, FieldId, Hash128, Hash160, Hash256, PathSet, SerializedTypeId, Vector256,
};

use crate::array::RecordArray;
use crate::config::CodecConfig;
use crate::error::{RecordError, RecordResult};
use crate::fields::{self, ARRAY_END_MARKER, OBJECT_END_MARKER};
use crate::record::{Record, Slot};
use crate::template::Template;
use crate::value::Value;

/// Which fields a serialization includes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SerializeMode {
    /// Every present field.
    Full,
    /// Top-level fields marked as signing fields only.
    Signing,
}

impl Value {
    /// Write the payload of this value (no field header).
    pub fn encode(&self, s: &mut Serializer) {
        match self {
            Value::NotPresent => {}
            Value::UInt8(v) => v.encode(s),
            Value::UInt16(v) => v.encode(s),
            Value::UInt32(v) => v.encode(s),
            Value::UInt64(v) => v.encode(s),
            Value::Hash128(v) => v.encode(s),
            Value::Hash160(v) => v.encode(s),
            Value::Hash256(v) => v.encode(s),
            Value::Blob(v) => v.encode(s),
            Value::Account(v) => v.encode(s),
            Value::Amount(v) => v.encode(s),
            Value::PathSet(v) => v.encode(s),
            Value::Vector256(v) => v.encode(s),
            Value::Object(r) => {
                r.write_to(s, SerializeMode::Full);
                s.add_field_header(&OBJECT_END_MARKER);
            }
            Value::Array(a) => {
                for element in a {
                    let named = fields::resolve(element.name())
                        .filter(|f| f.kind() == SerializedTypeId::Object);
                    if named.is_none() {
                        s.fail(CodecError::Unencodable(format!(
                            "array element named {} is not an object field",
                            element.name()
                        )));
                        return;
                    }
                    s.add_field_header(element.name());
                    element.write_to(s, SerializeMode::Full);
                    s.add_field_header(&OBJECT_END_MARKER);
                }
                s.add_field_header(&ARRAY_END_MARKER);
            }
        }
    }

    /// Read the payload of `field` from `it`.
    fn decode(
        field: &FieldId,
        it: &mut SerialIter<'_>,
        depth: u32,
        config: &CodecConfig,
    ) -> RecordResult<Self> {
        Ok(match field.kind() {
            SerializedTypeId::UInt8 => Value::UInt8(u8::decode(it)?),
            SerializedTypeId::UInt16 => Value::UInt16(u16::decode(it)?),
            SerializedTypeId::UInt32 => Value::UInt32(u32::decode(it)?),
            SerializedTypeId::UInt64 => Value::UInt64(u64::decode(it)?),
            SerializedTypeId::Hash128 => Value::Hash128(Hash128::decode(it)?),
            SerializedTypeId::Hash160 => Value::Hash160(Hash160::decode(it)?),
            SerializedTypeId::Hash256 => Value::Hash256(Hash256::decode(it)?),
            SerializedTypeId::Blob => {
                let blob = Vec::<u8>::decode(it)?;
                if blob.len() > config.max_blob_len {
                    return Err(RecordError::DecodeMalformed(format!(
                        "{} is {} bytes, limit is {}",
                        field.name(),
                        blob.len(),
                        config.max_blob_len
                    )));
                }
                Value::Blob(blob)
            }
            SerializedTypeId::AccountId => Value::Account(AccountId::decode(it)?),
            SerializedTypeId::Amount => Value::Amount(Amount::decode(it)?),
            SerializedTypeId::PathSet => Value::PathSet(PathSet::decode(it)?),
            SerializedTypeId::Vector256 => Value::Vector256(Vector256::decode(it)?),
            SerializedTypeId::Object => {
                let mut inner = Record::decode_fields(it, *field, depth + 1, config, true)?;
                inner.apply_template_from_field(field)?;
                Value::Object(inner)
            }
            SerializedTypeId::Array => Value::Array(RecordArray::decode(it, depth + 1, config)?),
            SerializedTypeId::NotPresent => {
                return Err(RecordError::DecodeMalformed(format!(
                    "{} has no wire type",
                    field.name()
                )))
            }
        })
    }
}

impl RecordArray {
    fn decode(it: &mut SerialIter<'_>, depth: u32, config: &CodecConfig) -> RecordResult<Self> {
        check_depth(depth, config)?;
        let mut array = RecordArray::new();
        loop {
            if it.is_empty() {
                return Err(RecordError::DecodeTruncated { needed: 1, remaining: 0 });
            }
            let field = read_field_header(it)?;
            if field == ARRAY_END_MARKER {
                break;
            }
            if field == OBJECT_END_MARKER {
                return Err(RecordError::DecodeMalformed(
                    "object end marker inside array".into(),
                ));
            }
            let field = registered(field)?;
            if field.kind() != SerializedTypeId::Object {
                return Err(RecordError::DecodeMalformed(format!(
                    "array element {} is not an object",
                    field.name()
                )));
            }
            let mut element = Record::decode_fields(it, field, depth + 1, config, true)?;
            element.apply_template_from_field(&field)?;
            array.push(element);
        }
        Ok(array)
    }
}

impl Record {
    /// Decode a top-level record from `it`, consuming input until it is
    /// exhausted.
    pub fn decode(
        it: &mut SerialIter<'_>,
        name: FieldId,
        config: &CodecConfig,
    ) -> RecordResult<Self> {
        Self::decode_fields(it, name, 0, config, false)
    }

    /// Decode a complete top-level record held in `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> RecordResult<Self> {
        Self::from_bytes_with(bytes, &CodecConfig::default())
    }

    pub fn from_bytes_with(bytes: &[u8], config: &CodecConfig) -> RecordResult<Self> {
        let mut it = SerialIter::new(bytes);
        let record = Self::decode(&mut it, FieldId::GENERIC, config)?;
        trace!(bytes = bytes.len(), fields = record.len(), "record decoded");
        Ok(record)
    }

    /// Decode `bytes` and bind the result to `template`.
    pub fn from_bytes_with_template(
        bytes: &[u8],
        template: Arc<Template>,
        config: &CodecConfig,
    ) -> RecordResult<Self> {
        let mut record = Self::from_bytes_with(bytes, config)?;
        record.apply_template(template)?;
        Ok(record)
    }

    fn decode_fields(
        it: &mut SerialIter<'_>,
        name: FieldId,
        depth: u32,
        config: &CodecConfig,
        nested: bool,
    ) -> RecordResult<Self> {
        check_depth(depth, config)?;
        let mut record = Record::new(name);
        let mut terminated = false;

        while !it.is_empty() {
            let field = read_field_header(it)?;
            if field == OBJECT_END_MARKER {
                if !nested {
                    if config.allow_trailing_bytes {
                        break;
                    }
                    return Err(RecordError::DecodeMalformed(
                        "object end marker at top level".into(),
                    ));
                }
                terminated = true;
                break;
            }
            if field == ARRAY_END_MARKER {
                return Err(RecordError::DecodeMalformed(
                    "array end marker inside object".into(),
                ));
            }
            let field = registered(field)?;
            let value = Value::decode(&field, it, depth, config)?;
            record.slots.push(Slot { field, value });
        }

        if nested && !terminated {
            return Err(RecordError::DecodeTruncated { needed: 1, remaining: 0 });
        }

        let mut codes: Vec<u32> = record.slots.iter().map(|s| s.field.code()).collect();
        codes.sort_unstable();
        if let Some(pair) = codes.windows(2).find(|w| w[0] == w[1]) {
            let name = fields::lookup((pair[0] >> 16) as u16, pair[0] as u8)
                .map_or("unknown", |f| f.name());
            return Err(RecordError::DecodeMalformed(format!("duplicate field {name}")));
        }
        Ok(record)
    }

    /// Append the canonical encoding of this record's fields to `s`.
    pub fn write_to(&self, s: &mut Serializer, mode: SerializeMode) {
        for slot in self.effective_slots() {
            if mode == SerializeMode::Signing && !slot.field.is_signing() {
                continue;
            }
            s.add_field_header(&slot.field);
            slot.value.encode(s);
        }
    }

    fn serialize(&self, mode: SerializeMode) -> RecordResult<Vec<u8>> {
        let mut s = Serializer::new();
        self.write_to(&mut s, mode);
        let bytes = s.finish()?;
        debug!(name = self.name().name(), ?mode, len = bytes.len(), "record serialized");
        Ok(bytes)
    }

    /// Canonical encoding of every present field.
    pub fn to_bytes(&self) -> RecordResult<Vec<u8>> {
        self.serialize(SerializeMode::Full)
    }

    /// Canonical encoding of the signing fields only.
    pub fn signing_bytes(&self) -> RecordResult<Vec<u8>> {
        self.serialize(SerializeMode::Signing)
    }

    /// BLAKE3 hash of `prefix` followed by the full encoding.
    pub fn hash(&self, prefix: HashPrefix) -> RecordResult<Hash256> {
        self.hash_with(&Blake3Digest, prefix)
    }

    /// BLAKE3 hash of `prefix` followed by the signing encoding.
    pub fn signing_hash(&self, prefix: HashPrefix) -> RecordResult<Hash256> {
        self.signing_hash_with(&Blake3Digest, prefix)
    }

    pub fn hash_with(&self, digest: &dyn Digest, prefix: HashPrefix) -> RecordResult<Hash256> {
        Ok(digest.prefixed(prefix, &self.to_bytes()?))
    }

    pub fn signing_hash_with(
        &self,
        digest: &dyn Digest,
        prefix: HashPrefix,
    ) -> RecordResult<Hash256> {
        Ok(digest.prefixed(prefix, &self.signing_bytes()?))
    }
}

fn check_depth(depth: u32, config: &CodecConfig) -> RecordResult<()> {
    if depth > config.max_depth {
        return Err(RecordError::DecodeMalformed(format!(
            "nesting depth {depth} exceeds limit {}",
            config.max_depth
        )));
    }
    Ok(())
}

/// Read a field header, returning an unnamed id for marker checks.
fn read_field_header(it: &mut SerialIter<'_>) -> RecordResult<FieldId> {
    let (type_code, ordinal) = it.get_field_id()?;
    let kind = SerializedTypeId::from_code(type_code)
        .map_err(|_| RecordError::DecodeMalformed(format!("unknown type code {type_code}")))?;
    Ok(FieldId::new(kind, ordinal, "Unregistered"))
}

fn registered(field: FieldId) -> RecordResult<FieldId> {
    fields::resolve(&field).ok_or_else(|| {
        RecordError::DecodeMalformed(format!(
            "unknown field {}/{}",
            field.kind(),
            field.ordinal()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use xrec_codec::MAX_VL_LENGTH;

    fn hex_bytes(s: &str) -> Vec<u8> {
        hex::decode(s).unwrap()
    }

    #[test]
    fn encodes_in_canonical_order() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::SEQUENCE, 1).unwrap();
        r.set(&fields::TRANSACTION_TYPE, 0).unwrap();
        // UInt16/2 (0x12) sorts before UInt32/4 (0x24)
        assert_eq!(hex::encode_upper(r.to_bytes().unwrap()), "1200002400000001");
    }

    #[test]
    fn signing_mode_drops_non_signing_fields() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::SEQUENCE, 1).unwrap();
        r.set(&fields::TXN_SIGNATURE, vec![0xAA]).unwrap();
        assert_eq!(hex::encode_upper(r.to_bytes().unwrap()), "24000000017401AA");
        assert_eq!(hex::encode_upper(r.signing_bytes().unwrap()), "2400000001");
    }

    #[test]
    fn nested_object_keeps_non_signing_fields() {
        let mut signer = Record::new(fields::SIGNER.id());
        signer.set(&fields::TXN_SIGNATURE, vec![0x01]).unwrap();
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::TRANSACTION_META_DATA, signer).unwrap();
        // E2 header, 74 01 01 payload, E1 terminator
        assert_eq!(hex::encode_upper(r.signing_bytes().unwrap()), "E2740101E1");
    }

    #[test]
    fn decode_roundtrip_with_nested_array() {
        let mut memo = Record::new(fields::MEMO.id());
        memo.set(&fields::MEMO_DATA, b"hi".to_vec()).unwrap();
        let mut memos = RecordArray::new();
        memos.push(memo);

        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::FLAGS, 0x8000_0000).unwrap();
        r.set(&fields::MEMOS, memos).unwrap();

        let bytes = r.to_bytes().unwrap();
        let back = Record::from_bytes(&bytes).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.to_bytes().unwrap(), bytes);

        let memos = back.get(&fields::MEMOS).unwrap();
        assert!(!memos[0].is_free());
        assert_eq!(memos[0].name(), &fields::MEMO.id());
    }

    #[test]
    fn array_elements_must_be_named_after_object_fields() {
        let mut generic = Record::default();
        generic.set(&fields::MEMO_DATA, b"hi".to_vec()).unwrap();
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::MEMOS, RecordArray::from(vec![generic])).unwrap();
        assert!(matches!(
            r.to_bytes(),
            Err(RecordError::Encode(CodecError::Unencodable(_)))
        ));

        let mut blob_named = Record::new(fields::MEMO_DATA.id());
        blob_named.set(&fields::MEMO_TYPE, b"t".to_vec()).unwrap();
        r.set(&fields::MEMOS, RecordArray::from(vec![blob_named])).unwrap();
        assert!(r.to_bytes().is_err());
        assert!(r.signing_bytes().is_err());
    }

    #[test]
    fn rejects_unknown_field() {
        // UInt32 ordinal 15 is not registered
        let err = Record::from_bytes(&hex_bytes("2F00000001")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeMalformed(_)));
    }

    #[test]
    fn rejects_unknown_type() {
        // type nibble 9 is not assigned
        let err = Record::from_bytes(&hex_bytes("9100")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeMalformed(_)));
    }

    #[test]
    fn rejects_duplicate_field() {
        let err = Record::from_bytes(&hex_bytes("24000000012400000002")).unwrap_err();
        assert_eq!(err, RecordError::DecodeMalformed("duplicate field Sequence".into()));
    }

    #[test]
    fn rejects_truncated_value() {
        let err = Record::from_bytes(&hex_bytes("240000")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeTruncated { .. }));
    }

    #[test]
    fn rejects_unterminated_object() {
        // ModifiedNode header followed by a Sequence, no end marker
        let err = Record::from_bytes(&hex_bytes("E52400000001")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeTruncated { .. }));
    }

    #[test]
    fn rejects_array_marker_in_object() {
        let err = Record::from_bytes(&hex_bytes("2400000001F1")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeMalformed(_)));
    }

    #[test]
    fn rejects_non_object_array_element() {
        // Memos array holding a Sequence
        let err = Record::from_bytes(&hex_bytes("F92400000001F1")).unwrap_err();
        assert!(matches!(err, RecordError::DecodeMalformed(_)));
    }

    #[test]
    fn top_level_end_marker() {
        let bytes = hex_bytes("2400000001E1FFFF");
        assert!(matches!(
            Record::from_bytes(&bytes),
            Err(RecordError::DecodeMalformed(_))
        ));
        let lenient = CodecConfig {
            allow_trailing_bytes: true,
            ..Default::default()
        };
        let r = Record::from_bytes_with(&bytes, &lenient).unwrap();
        assert_eq!(r.get(&fields::SEQUENCE).unwrap(), 1);
    }

    #[test]
    fn depth_limit() {
        let mut r = Record::new(fields::MODIFIED_NODE.id());
        for _ in 0..5 {
            let mut outer = Record::new(fields::MODIFIED_NODE.id());
            outer.set(&fields::FINAL_FIELDS, r).unwrap();
            r = outer;
        }
        let bytes = r.to_bytes().unwrap();
        let tight = CodecConfig {
            max_depth: 2,
            ..Default::default()
        };
        assert!(matches!(
            Record::from_bytes_with(&bytes, &tight),
            Err(RecordError::DecodeMalformed(_))
        ));
        assert!(Record::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn blob_limit() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::DOMAIN, vec![0; 64]).unwrap();
        let bytes = r.to_bytes().unwrap();
        let tight = CodecConfig {
            max_blob_len: 16,
            ..Default::default()
        };
        assert!(Record::from_bytes_with(&bytes, &tight).is_err());
        assert_eq!(CodecConfig::default().max_blob_len, MAX_VL_LENGTH);
    }

    #[test]
    fn inner_template_violation_surfaces() {
        // SignerEntry missing its required SignerWeight, inside SignerEntries
        let mut entry = Record::new(fields::SIGNER_ENTRY.id());
        entry.set(&fields::ACCOUNT, AccountId::from_array([1; 20])).unwrap();
        let mut entries = RecordArray::new();
        entries.push(entry);
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::SIGNER_ENTRIES, entries).unwrap();

        let err = Record::from_bytes(&r.to_bytes().unwrap()).unwrap_err();
        assert!(matches!(err, RecordError::TemplateViolation { field: "SignerWeight", .. }));
    }

    #[test]
    fn hashes_depend_on_prefix_and_digest() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::SEQUENCE, 9).unwrap();
        let a = r.hash(HashPrefix::TRANSACTION_ID).unwrap();
        let b = r.hash(HashPrefix::TX_SIGN).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, r.hash(HashPrefix::TRANSACTION_ID).unwrap());
        let c = r.hash_with(&xrec_crypto::Sha512Half, HashPrefix::TRANSACTION_ID).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn signing_hash_ignores_signature() {
        let mut r = Record::new(FieldId::GENERIC);
        r.set(&fields::SEQUENCE, 9).unwrap();
        let before = r.signing_hash(HashPrefix::TX_SIGN).unwrap();
        r.set(&fields::TXN_SIGNATURE, vec![1, 2, 3]).unwrap();
        assert_eq!(r.signing_hash(HashPrefix::TX_SIGN).unwrap(), before);
        assert_ne!(r.hash(HashPrefix::TX_SIGN).unwrap(), before);
    }
}
