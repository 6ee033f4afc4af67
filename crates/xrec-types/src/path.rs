use std::fmt;

use serde::{Deserialize, Serialize};

use crate::account::{AccountId, Currency};
use crate::error::TypeError;

/// One hop of a payment path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathElement {
    account: Option<AccountId>,
    currency: Option<Currency>,
    issuer: Option<AccountId>,
}

impl PathElement {
    pub const TYPE_ACCOUNT: u8 = 0x01;
    pub const TYPE_CURRENCY: u8 = 0x10;
    pub const TYPE_ISSUER: u8 = 0x20;
    pub const TYPE_ALL: u8 = Self::TYPE_ACCOUNT | Self::TYPE_CURRENCY | Self::TYPE_ISSUER;

    /// Build a hop; at least one component must be set.
    pub fn new(
        account: Option<AccountId>,
        currency: Option<Currency>,
        issuer: Option<AccountId>,
    ) -> Result<Self, TypeError> {
        if account.is_none() && currency.is_none() && issuer.is_none() {
            return Err(TypeError::InvalidPathElement("empty path element".into()));
        }
        Ok(Self {
            account,
            currency,
            issuer,
        })
    }

    pub fn account(&self) -> Option<AccountId> {
        self.account
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency
    }

    pub fn issuer(&self) -> Option<AccountId> {
        self.issuer
    }

    /// Wire type byte: one bit per present component.
    pub fn type_byte(&self) -> u8 {
        let mut t = 0;
        if self.account.is_some() {
            t |= Self::TYPE_ACCOUNT;
        }
        if self.currency.is_some() {
            t |= Self::TYPE_CURRENCY;
        }
        if self.issuer.is_some() {
            t |= Self::TYPE_ISSUER;
        }
        t
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(account) = &self.account {
            parts.push(format!("account={account}"));
        }
        if let Some(currency) = &self.currency {
            parts.push(format!("currency={currency}"));
        }
        if let Some(issuer) = &self.issuer {
            parts.push(format!("issuer={issuer}"));
        }
        write!(f, "{{{}}}", parts.join(","))
    }
}

/// Ordered list of hops.
pub type Path = Vec<PathElement>;

/// Ordered set of alternative payment paths.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathSet(Vec<Path>);

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path. Empty paths are not representable on the wire.
    pub fn push(&mut self, path: Path) -> Result<(), TypeError> {
        if path.is_empty() {
            return Err(TypeError::InvalidPathElement("empty path".into()));
        }
        self.0.push(path);
        Ok(())
    }

    pub fn paths(&self) -> &[Path] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PathSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .0
            .iter()
            .map(|path| {
                let hops: Vec<String> = path.iter().map(ToString::to_string).collect();
                format!("[{}]", hops.join(","))
            })
            .collect();
        write!(f, "[{}]", rendered.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_element_rejected() {
        assert!(PathElement::new(None, None, None).is_err());
    }

    #[test]
    fn type_byte_reflects_components() {
        let e = PathElement::new(Some(AccountId::zero()), None, Some(AccountId::zero())).unwrap();
        assert_eq!(e.type_byte(), PathElement::TYPE_ACCOUNT | PathElement::TYPE_ISSUER);
    }

    #[test]
    fn empty_path_rejected() {
        let mut set = PathSet::new();
        assert!(set.push(Vec::new()).is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn display_lists_paths() {
        let mut set = PathSet::new();
        let hop = PathElement::new(None, Some(Currency::from_code("EUR").unwrap()), None).unwrap();
        set.push(vec![hop]).unwrap();
        assert_eq!(set.to_string(), "[[{currency=EUR}]]");
    }
}
