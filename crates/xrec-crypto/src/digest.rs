use sha2::Digest as _;
use xrec_types::Hash256;

use crate::prefix::HashPrefix;

/// Fixed-width digest over an opaque byte sequence.
///
/// Implementations must be referentially transparent: the same input parts,
/// concatenated, always give the same digest.
pub trait Digest {
    /// Short name used in logs and on the command line.
    fn name(&self) -> &'static str;

    /// Digest of the concatenation of `parts`.
    fn digest_parts(&self, parts: &[&[u8]]) -> Hash256;

    /// Digest of `data`.
    fn digest(&self, data: &[u8]) -> Hash256 {
        self.digest_parts(&[data])
    }

    /// Digest of `prefix ‖ data`.
    fn prefixed(&self, prefix: HashPrefix, data: &[u8]) -> Hash256 {
        self.digest_parts(&[&prefix.to_bytes()[..], data])
    }
}

/// BLAKE3, the default digest.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Digest;

impl Digest for Blake3Digest {
    fn name(&self) -> &'static str {
        "blake3"
    }

    fn digest_parts(&self, parts: &[&[u8]]) -> Hash256 {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(*part);
        }
        Hash256::from_array(*hasher.finalize().as_bytes())
    }
}

/// First half of SHA-512.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha512Half;

impl Digest for Sha512Half {
    fn name(&self) -> &'static str {
        "sha512half"
    }

    fn digest_parts(&self, parts: &[&[u8]]) -> Hash256 {
        let mut hasher = sha2::Sha512::new();
        for part in parts {
            hasher.update(*part);
        }
        let full = hasher.finalize();
        let mut half = [0u8; 32];
        half.copy_from_slice(&full[..32]);
        Hash256::from_array(half)
    }
}

/// Resolve a digest by its [`Digest::name`].
pub fn digest_by_name(name: &str) -> Option<&'static dyn Digest> {
    static BLAKE3: Blake3Digest = Blake3Digest;
    static SHA512_HALF: Sha512Half = Sha512Half;
    match name.to_ascii_lowercase().as_str() {
        "blake3" => Some(&BLAKE3),
        "sha512half" | "sha512-half" => Some(&SHA512_HALF),
        _ => None,
    }
}
