//! Generic keyed table, the building block for every pool.

use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// How consumers are expected to resolve a table's entries.
///
/// This is pure metadata: the table records the tag and hands it back,
/// it never enforces a resolution strategy itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Pick exactly one entry at resolution time.
    #[default]
    Select,
    /// Resolution consumes every entry.
    All,
}

/// Unordered key/value table tagged with a [`SelectionMode`].
///
/// No ordering guarantee holds across keys. The table is not internally
/// synchronized; owners that share it across threads serialize access
/// (see [`crate::Registry`]).
///
/// # Examples
///
/// ```
/// use mogpool::{KeyedTable, SelectionMode};
///
/// let mut table: KeyedTable<String, u32> = KeyedTable::new();
/// assert_eq!(table.mode(), SelectionMode::Select);
///
/// table.put("retries".to_string(), 3);
/// assert_eq!(table.get(&"retries".to_string()), Some(&3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedTable<K: Eq + Hash, V> {
    entries: HashMap<K, V>,
    mode: SelectionMode,
}

impl<K: Eq + Hash, V> KeyedTable<K, V> {
    /// Creates an empty table with the default [`SelectionMode::Select`] tag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(SelectionMode::default())
    }

    /// Creates an empty table with an explicit selection mode.
    #[must_use]
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            entries: HashMap::new(),
            mode,
        }
    }

    /// Returns the selection-mode tag.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Replaces the selection-mode tag.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in no particular order.
    pub fn iter(&self) -> hash_map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Iterates over keys in no particular order.
    pub fn keys(&self) -> hash_map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Iterates over values in no particular order.
    pub fn values(&self) -> hash_map::Values<'_, K, V> {
        self.entries.values()
    }
}

impl<K: Eq + Hash, V> KeyedTable<K, V> {
    /// Inserts or replaces the value under `key`, returning the prior value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    /// Returns the current value under `key`, if any.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Returns true if a value is present under `key`.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Removes and returns the value under `key`, if any.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }
}

impl<K: Eq + Hash, V> Default for KeyedTable<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for KeyedTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            mode: SelectionMode::default(),
        }
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a KeyedTable<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = hash_map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_inserts_and_replaces() {
        let mut table = KeyedTable::new();
        assert_eq!(table.put("a", 1), None);
        assert_eq!(table.put("a", 2), Some(1));
        assert_eq!(table.get(&"a"), Some(&2));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_on_missing_key_is_none() {
        let table: KeyedTable<&str, i32> = KeyedTable::new();
        assert_eq!(table.get(&"missing"), None);
        assert!(!table.contains_key(&"missing"));
        assert!(table.is_empty());
    }

    #[test]
    fn remove_returns_prior_value() {
        let mut table = KeyedTable::new();
        table.put("a", 1);
        assert_eq!(table.remove(&"a"), Some(1));
        assert_eq!(table.remove(&"a"), None);
        assert!(table.is_empty());
    }

    #[test]
    fn selection_mode_defaults_to_select_and_is_mutable() {
        let mut table: KeyedTable<&str, i32> = KeyedTable::new();
        assert_eq!(table.mode(), SelectionMode::Select);

        table.set_mode(SelectionMode::All);
        assert_eq!(table.mode(), SelectionMode::All);

        let all = KeyedTable::<&str, i32>::with_mode(SelectionMode::All);
        assert_eq!(all.mode(), SelectionMode::All);
    }

    #[test]
    fn mode_is_metadata_only() {
        // Putting and getting behave identically regardless of the tag.
        let mut table = KeyedTable::with_mode(SelectionMode::All);
        table.put("a", 1);
        table.put("b", 2);
        assert_eq!(table.get(&"a"), Some(&1));
        assert_eq!(table.get(&"b"), Some(&2));
    }

    #[test]
    fn from_iterator_collects_entries() {
        let table: KeyedTable<&str, i32> = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(table.len(), 2);
        assert_eq!(table.mode(), SelectionMode::Select);

        let mut keys: Vec<&str> = table.keys().copied().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn serde_round_trip_preserves_mode() {
        let mut table: KeyedTable<String, i32> = KeyedTable::with_mode(SelectionMode::All);
        table.put("a".to_string(), 1);

        let json = serde_json::to_string(&table).unwrap();
        let back: KeyedTable<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
        assert_eq!(back.mode(), SelectionMode::All);
    }
}
