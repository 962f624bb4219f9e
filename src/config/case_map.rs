//! Insertion-ordered map with ASCII case-insensitive string keys
//!
//! Sink names, tags, sections and factory type names all compare
//! case-insensitively, and "first registered sink" depends on insertion
//! order. Entries are stored under the lowercased key with the spelling of
//! the first insertion kept next to the value.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseMap<V> {
    entries: IndexMap<String, (String, V)>,
}

impl<V> CaseMap<V> {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Insert or overwrite. An overwritten entry keeps its position and its
    /// original key spelling.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.entries.get_mut(&key.to_ascii_lowercase()) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.insert(key.to_ascii_lowercase(), (key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .get(&key.to_ascii_lowercase())
            .map(|(_, value)| value)
    }

    /// Entry for `key`, inserting `V::default()` when absent
    pub fn entry_or_default(&mut self, key: &str) -> &mut V
    where
        V: Default,
    {
        &mut self
            .entries
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| (key.to_string(), V::default()))
            .1
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&key.to_ascii_lowercase())
    }

    /// First entry in insertion order
    pub fn first(&self) -> Option<(&str, &V)> {
        self.entries
            .first()
            .map(|(_, (spelling, value))| (spelling.as_str(), value))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .values()
            .map(|(spelling, value)| (spelling.as_str(), value))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut V)> {
        self.entries
            .values_mut()
            .map(|(spelling, value)| (spelling.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(spelling, _)| spelling.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<V> Default for CaseMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for CaseMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}
