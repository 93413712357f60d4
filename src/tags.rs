use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Tag for an epoch-based date/time (RFC 8949 §3.4.2).
pub const TAG_DATE: u64 = 1;
/// Tag for an embedded CBOR data item (RFC 8949 §3.4.5.1).
pub const TAG_ENCODED_CBOR: u64 = 24;

/// Read-only mapping between tag values and display names.
///
/// Consulted by the diagnostic and dump printers; implementations must not mutate state while
/// formatting.
pub trait TagResolver {
    /// Display name assigned to `tag`, if any.
    fn assigned_name(&self, tag: u64) -> Option<&str>;

    /// Tag value assigned to `name`, if any.
    fn tag_for_name(&self, name: &str) -> Option<u64>;

    /// Assigned name of `tag`, falling back to its decimal value.
    fn name(&self, tag: u64) -> String {
        self.assigned_name(tag)
            .map_or_else(|| tag.to_string(), ToString::to_string)
    }
}

/// A [`TagResolver`] backed by two ordered maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagsStore {
    names_by_tag: BTreeMap<u64, String>,
    tags_by_name: BTreeMap<String, u64>,
}

impl TagsStore {
    /// Create an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            names_by_tag: BTreeMap::new(),
            tags_by_name: BTreeMap::new(),
        }
    }

    /// A store preloaded with the tags this crate knows about (`1` = `date`).
    #[must_use]
    pub fn with_known_tags() -> Self {
        let mut store = Self::new();
        store.insert(TAG_DATE, "date");
        store
    }

    /// Assign `name` to `tag`, replacing any earlier assignment of either.
    ///
    /// Empty names are ignored.
    pub fn insert(&mut self, tag: u64, name: impl Into<String>) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        if let Some(old) = self.names_by_tag.remove(&tag) {
            self.tags_by_name.remove(&old);
        }
        if let Some(old) = self.tags_by_name.remove(&name) {
            self.names_by_tag.remove(&old);
        }
        self.tags_by_name.insert(name.clone(), tag);
        self.names_by_tag.insert(tag, name);
    }

    /// Number of assigned tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names_by_tag.len()
    }

    /// Returns true iff no tags are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names_by_tag.is_empty()
    }
}

impl TagResolver for TagsStore {
    fn assigned_name(&self, tag: u64) -> Option<&str> {
        self.names_by_tag.get(&tag).map(String::as_str)
    }

    fn tag_for_name(&self, name: &str) -> Option<u64> {
        self.tags_by_name.get(name).copied()
    }
}

impl<N: Into<String>> FromIterator<(u64, N)> for TagsStore {
    fn from_iter<I: IntoIterator<Item = (u64, N)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (tag, name) in iter {
            store.insert(tag, name);
        }
        store
    }
}
