use std::fmt;

/// Four-byte tag prepended to data before hashing.
///
/// Distinct prefixes keep hashes of different object classes apart: a
/// transaction id and a signing hash over the same fields never collide.
/// Each prefix is three ASCII bytes followed by a zero byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashPrefix(u32);

const fn make(a: u8, b: u8, c: u8) -> HashPrefix {
    HashPrefix(((a as u32) << 24) | ((b as u32) << 16) | ((c as u32) << 8))
}

impl HashPrefix {
    /// Transaction id (full record).
    pub const TRANSACTION_ID: Self = make(b'T', b'X', b'N');
    /// Transaction plus metadata node.
    pub const TX_NODE: Self = make(b'S', b'N', b'D');
    /// Ledger state leaf node.
    pub const LEAF_NODE: Self = make(b'M', b'L', b'N');
    /// Inner tree node.
    pub const INNER_NODE: Self = make(b'M', b'I', b'N');
    /// Ledger header.
    pub const LEDGER_MASTER: Self = make(b'L', b'W', b'R');
    /// Single-signature signing payload.
    pub const TX_SIGN: Self = make(b'S', b'T', b'X');
    /// Multi-signature signing payload.
    pub const TX_MULTI_SIGN: Self = make(b'S', b'M', b'T');
    /// Validation.
    pub const VALIDATION: Self = make(b'V', b'A', b'L');
    /// Consensus proposal.
    pub const PROPOSAL: Self = make(b'P', b'R', b'P');
    /// Manifest.
    pub const MANIFEST: Self = make(b'M', b'A', b'N');
    /// Payment channel claim.
    pub const PAYMENT_CHANNEL_CLAIM: Self = make(b'C', b'L', b'M');

    const NAMED: [(&'static str, HashPrefix); 11] = [
        ("txn", Self::TRANSACTION_ID),
        ("snd", Self::TX_NODE),
        ("mln", Self::LEAF_NODE),
        ("min", Self::INNER_NODE),
        ("lwr", Self::LEDGER_MASTER),
        ("stx", Self::TX_SIGN),
        ("smt", Self::TX_MULTI_SIGN),
        ("val", Self::VALIDATION),
        ("prp", Self::PROPOSAL),
        ("man", Self::MANIFEST),
        ("clm", Self::PAYMENT_CHANNEL_CLAIM),
    ];

    /// Arbitrary prefix value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Big-endian wire bytes.
    pub const fn to_bytes(&self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    /// Look up a well-known prefix by its three-letter tag, case-insensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(tag))
            .map(|(_, prefix)| *prefix)
    }

    /// The three-letter tag, as ASCII.
    pub fn tag(&self) -> String {
        self.to_bytes()[..3].iter().map(|b| *b as char).collect()
    }
}

impl fmt::Debug for HashPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashPrefix({}:{:#010x})", self.tag(), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_are_ascii_with_zero_tail() {
        assert_eq!(HashPrefix::TRANSACTION_ID.to_bytes(), *b"TXN\0");
        assert_eq!(HashPrefix::TX_SIGN.value(), 0x5354_5800);
    }

    #[test]
    fn lookup_by_tag() {
        assert_eq!(HashPrefix::from_tag("STX"), Some(HashPrefix::TX_SIGN));
        assert_eq!(HashPrefix::from_tag("mln"), Some(HashPrefix::LEAF_NODE));
        assert_eq!(HashPrefix::from_tag("zzz"), None);
    }

    #[test]
    fn tags_are_unique() {
        let mut values: Vec<u32> = HashPrefix::NAMED.iter().map(|(_, p)| p.value()).collect();
        let len = values.len();
        values.sort_unstable();
        values.dedup();
        assert_eq!(values.len(), len);
    }

    #[test]
    fn tag_roundtrip() {
        assert_eq!(HashPrefix::MANIFEST.tag(), "MAN");
    }
}
