use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::hash::Hash160;

/// 160-bit account identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AccountId(Hash160);

impl AccountId {
    /// Width in bytes.
    pub const LEN: usize = 20;

    /// The all-zero account.
    pub const fn zero() -> Self {
        Self(Hash160::zero())
    }

    /// Wrap raw bytes.
    pub const fn from_array(bytes: [u8; 20]) -> Self {
        Self(Hash160::from_array(bytes))
    }

    /// Build from a slice of exactly 20 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        Hash160::from_slice(bytes).map(Self)
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        Hash160::from_hex(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_bytes()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0.to_hex())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl From<[u8; 20]> for AccountId {
    fn from(bytes: [u8; 20]) -> Self {
        Self::from_array(bytes)
    }
}

/// 160-bit currency code.
///
/// Standard codes place three ASCII characters at bytes 12..15 with every
/// other byte zero. The all-zero currency denotes the native asset.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Currency(Hash160);

impl Currency {
    /// The native currency (all zeros).
    pub const fn native() -> Self {
        Self(Hash160::zero())
    }

    /// Build a standard three-letter currency code such as `"USD"`.
    pub fn from_code(code: &str) -> Result<Self, TypeError> {
        let bytes = code.as_bytes();
        let valid = bytes.len() == 3
            && bytes.iter().all(|b| b.is_ascii_alphanumeric())
            && !code.eq_ignore_ascii_case("XRP");
        if !valid {
            return Err(TypeError::InvalidCurrency(code.to_string()));
        }
        let mut raw = [0u8; 20];
        raw[12..15].copy_from_slice(bytes);
        Ok(Self(Hash160::from_array(raw)))
    }

    pub const fn from_array(bytes: [u8; 20]) -> Self {
        Self(Hash160::from_array(bytes))
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, TypeError> {
        Hash160::from_slice(bytes).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        self.0.as_bytes()
    }

    pub fn is_native(&self) -> bool {
        self.0.is_zero()
    }

    /// The three-letter code, if this is a standard currency.
    pub fn code(&self) -> Option<&str> {
        let raw = self.0.as_bytes();
        let standard = raw[..12].iter().all(|b| *b == 0)
            && raw[15..].iter().all(|b| *b == 0)
            && raw[12..15].iter().all(|b| b.is_ascii_alphanumeric());
        if standard {
            std::str::from_utf8(&raw[12..15]).ok()
        } else {
            None
        }
    }
}

impl fmt::Debug for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Currency({self})")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            return f.write_str("XRP");
        }
        match self.code() {
            Some(code) => f.write_str(code),
            None => f.write_str(&self.0.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_hex_roundtrip() {
        let acct = AccountId::from_array([0x11; 20]);
        assert_eq!(AccountId::from_hex(&acct.to_hex()).unwrap(), acct);
    }

    #[test]
    fn account_rejects_short_slice() {
        let err = AccountId::from_slice(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, TypeError::InvalidLength { expected: 20, actual: 3 });
    }

    #[test]
    fn standard_currency_code() {
        let usd = Currency::from_code("USD").unwrap();
        assert_eq!(usd.code(), Some("USD"));
        assert_eq!(usd.to_string(), "USD");
        assert!(!usd.is_native());
    }

    #[test]
    fn native_currency_code_rejected() {
        assert!(Currency::from_code("XRP").is_err());
        assert!(Currency::from_code("TOOLONG").is_err());
    }

    #[test]
    fn nonstandard_currency_displays_hex() {
        let c = Currency::from_array([0xFF; 20]);
        assert_eq!(c.code(), None);
        assert_eq!(c.to_string().len(), 40);
    }

    #[test]
    fn native_display() {
        assert_eq!(Currency::native().to_string(), "XRP");
    }
}
