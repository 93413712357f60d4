use alloc::collections::btree_map::{self, BTreeMap};
use alloc::vec::Vec;
use core::fmt;

use crate::{CborEncode, ErrorCode, Item};

#[derive(Clone, PartialEq)]
struct MapEntry {
    key: Item,
    value: Item,
}

/// A CBOR map whose entries are ordered by the canonical encoding of their keys.
///
/// Keys are compared as raw encoded bytes (RFC 8949 §4.2.1 bytewise lexicographic order), so
/// iteration and serialization always yield entries in canonical order regardless of insertion
/// order.
#[derive(Clone, Default, PartialEq)]
pub struct Map {
    entries: BTreeMap<Vec<u8>, MapEntry>,
}

impl Map {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true iff the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert an entry, replacing and returning any value stored under an equal key.
    pub fn insert(&mut self, key: impl Into<Item>, value: impl Into<Item>) -> Option<Item> {
        let key = key.into();
        let value = value.into();
        self.entries
            .insert(key.to_cbor_data(), MapEntry { key, value })
            .map(|old| old.value)
    }

    /// Append an entry whose key must sort strictly after every key already present.
    pub(crate) fn insert_next(&mut self, key: Item, value: Item) -> Result<(), ErrorCode> {
        let key_data = key.to_cbor_data();
        if let Some((last, _)) = self.entries.last_key_value() {
            match last.as_slice().cmp(key_data.as_slice()) {
                core::cmp::Ordering::Less => {}
                core::cmp::Ordering::Equal => return Err(ErrorCode::DuplicateMapKey),
                core::cmp::Ordering::Greater => return Err(ErrorCode::MisorderedMapKey),
            }
        }
        self.entries.insert(key_data, MapEntry { key, value });
        Ok(())
    }

    /// Value stored under `key`.
    pub fn get<K: CborEncode + ?Sized>(&self, key: &K) -> Option<&Item> {
        self.entries.get(&key.to_cbor_data()).map(|e| &e.value)
    }

    /// Returns true iff an entry with `key` exists.
    pub fn contains_key<K: CborEncode + ?Sized>(&self, key: &K) -> bool {
        self.entries.contains_key(&key.to_cbor_data())
    }

    /// Remove the entry under `key`, returning its value.
    pub fn remove<K: CborEncode + ?Sized>(&mut self, key: &K) -> Option<Item> {
        self.entries.remove(&key.to_cbor_data()).map(|e| e.value)
    }

    /// Entries in canonical order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Keys in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = &Item> {
        self.entries.values().map(|e| &e.key)
    }

    /// Values in canonical key order.
    pub fn values(&self) -> impl Iterator<Item = &Item> {
        self.entries.values().map(|e| &e.value)
    }

    /// Entries in canonical order, each with the encoded key bytes.
    pub(crate) fn encoded_entries(&self) -> impl Iterator<Item = (&[u8], &Item, &Item)> {
        self.entries
            .iter()
            .map(|(k, e)| (k.as_slice(), &e.key, &e.value))
    }
}

/// Iterator over map entries in canonical order.
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, Vec<u8>, MapEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a Item, &'a Item);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, e)| (&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, e)| (&e.key, &e.value))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Map {
    type Item = (&'a Item, &'a Item);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<Item>, V: Into<Item>> FromIterator<(K, V)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<Item>, V: Into<Item>> Extend<(K, V)> for Map {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
