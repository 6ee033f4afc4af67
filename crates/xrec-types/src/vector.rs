use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hash::Hash256;

/// Ordered vector of 256-bit hashes (directory indexes, amendment lists).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector256(Vec<Hash256>);

impl Vector256 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, hash: Hash256) {
        self.0.push(hash);
    }

    pub fn as_slice(&self) -> &[Hash256] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, hash: &Hash256) -> bool {
        self.0.contains(hash)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Hash256> {
        self.0.iter()
    }
}

impl From<Vec<Hash256>> for Vector256 {
    fn from(hashes: Vec<Hash256>) -> Self {
        Self(hashes)
    }
}

impl FromIterator<Hash256> for Vector256 {
    fn from_iter<I: IntoIterator<Item = Hash256>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Vector256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hashes: Vec<String> = self.0.iter().map(Hash256::to_hex).collect();
        write!(f, "[{}]", hashes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_and_preserves_order() {
        let v: Vector256 = [Hash256::from_array([2; 32]), Hash256::from_array([1; 32])]
            .into_iter()
            .collect();
        assert_eq!(v.len(), 2);
        assert_eq!(v.as_slice()[0], Hash256::from_array([2; 32]));
        assert!(v.contains(&Hash256::from_array([1; 32])));
    }

    #[test]
    fn default_is_empty() {
        assert!(Vector256::default().is_empty());
        assert_eq!(Vector256::default().to_string(), "[]");
    }
}
