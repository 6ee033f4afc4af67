use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

macro_rules! fixed_hash {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Width in bytes.
            pub const LEN: usize = $len;

            /// The all-zero value.
            pub const fn zero() -> Self {
                Self([0u8; $len])
            }

            /// Wrap raw bytes.
            pub const fn from_array(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            /// Build from a slice of exactly `LEN` bytes.
            pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
                if bytes.len() != $len {
                    return Err(TypeError::InvalidLength {
                        expected: $len,
                        actual: bytes.len(),
                    });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(bytes);
                Ok(Self(arr))
            }

            /// Returns `true` if every byte is zero.
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            /// The raw bytes.
            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            /// Upper-case hex representation.
            pub fn to_hex(&self) -> String {
                hex::encode_upper(self.0)
            }

            /// Parse from a hex string (either case).
            pub fn from_hex(s: &str) -> Result<Self, TypeError> {
                let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
                Self::from_slice(&bytes)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.to_hex())
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; $len] {
            fn from(h: $name) -> Self {
                h.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

fixed_hash!(
    /// 128-bit opaque hash (e.g. an email hash).
    Hash128,
    16
);
fixed_hash!(
    /// 160-bit opaque hash (currency and issuer halves of an order book).
    Hash160,
    20
);
fixed_hash!(
    /// 256-bit hash: ledger object keys, transaction ids, digests.
    Hash256,
    32
);
