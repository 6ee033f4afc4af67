use std::fmt;
use std::ops::{Index, IndexMut};

use serde_json::Value as Json;

use crate::record::Record;

/// Ordered list of nested records.
///
/// Each element keeps its own field name, which becomes the element's
/// header on the wire. Encoding fails unless that name is a registered
/// object field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordArray {
    items: Vec<Record>,
}

impl RecordArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.items.push(record);
    }

    pub fn pop(&mut self) -> Option<Record> {
        self.items.pop()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Record> {
        self.items.iter_mut()
    }

    /// JSON rendering: a list of single-key objects named after each element.
    pub fn to_json(&self) -> Json {
        Json::Array(
            self.items
                .iter()
                .map(|r| {
                    let mut wrapper = serde_json::Map::new();
                    wrapper.insert(r.name().name().to_string(), r.to_json());
                    Json::Object(wrapper)
                })
                .collect(),
        )
    }
}

impl From<Vec<Record>> for RecordArray {
    fn from(items: Vec<Record>) -> Self {
        Self { items }
    }
}

impl FromIterator<Record> for RecordArray {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordArray {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl Index<usize> for RecordArray {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.items[index]
    }
}

impl IndexMut<usize> for RecordArray {
    fn index_mut(&mut self, index: usize) -> &mut Record {
        &mut self.items[index]
    }
}

impl fmt::Display for RecordArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, r) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", r.full_text())?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields;

    fn memo(data: &[u8]) -> Record {
        let mut r = Record::new(fields::MEMO.id());
        r.set(&fields::MEMO_DATA, data.to_vec()).unwrap();
        r
    }

    #[test]
    fn push_and_index() {
        let mut a = RecordArray::new();
        assert!(a.is_empty());
        a.push(memo(b"a"));
        a.push(memo(b"b"));
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].get(&fields::MEMO_DATA).unwrap(), b"b".to_vec());
        a[0].set(&fields::MEMO_TYPE, b"t".to_vec()).unwrap();
        assert!(a.get(0).unwrap().is_field_present(&fields::MEMO_TYPE));
        assert!(a.get(5).is_none());
    }

    #[test]
    fn equality_is_ordered() {
        let ab: RecordArray = vec![memo(b"a"), memo(b"b")].into();
        let ba: RecordArray = vec![memo(b"b"), memo(b"a")].into();
        assert_ne!(ab, ba);
        let copy: RecordArray = ab.iter().cloned().collect();
        assert_eq!(ab, copy);
    }

    #[test]
    fn json_wraps_elements_by_name() {
        let a: RecordArray = vec![memo(&[0xAB])].into();
        let json = a.to_json();
        assert_eq!(json[0]["Memo"]["MemoData"], "AB");
    }
}
