//! Per-mogram scoping of keyed tables.

use std::collections::hash_map;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::identity::MogramId;
use crate::table::{KeyedTable, SelectionMode};

/// A [`KeyedTable`] specialization scoped per mogram.
///
/// The outer key is the owning mogram's identity; the inner table maps a
/// secondary name (a fidelity or entry name) to the pooled value. Tables
/// belonging to different mograms are fully isolated: nothing written under
/// one identity is ever visible under another.
///
/// A pool carries its own [`SelectionMode`] tag, which newly created inner
/// tables inherit.
///
/// An absent table and an empty table are distinct states: [`table`]
/// returns `None` for a mogram that has never registered one.
///
/// [`table`]: FidelityPool::table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FidelityPool<K: Eq + Hash, V> {
    tables: HashMap<MogramId, KeyedTable<K, V>>,
    mode: SelectionMode,
}

impl<K: Eq + Hash, V> FidelityPool<K, V> {
    /// Creates an empty pool with the default [`SelectionMode::Select`] tag.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(SelectionMode::default())
    }

    /// Creates an empty pool with an explicit selection mode.
    #[must_use]
    pub fn with_mode(mode: SelectionMode) -> Self {
        Self {
            tables: HashMap::new(),
            mode,
        }
    }

    /// Returns the pool-level selection-mode tag.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Replaces the pool-level selection-mode tag.
    ///
    /// Already-created inner tables keep the tag they were created with.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    /// Returns the number of mograms with a registered table.
    #[must_use]
    pub fn mogram_count(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no mogram has a registered table.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterates over the mogram identities with a registered table.
    pub fn mograms(&self) -> hash_map::Keys<'_, MogramId, KeyedTable<K, V>> {
        self.tables.keys()
    }

    /// Removes every table from the pool.
    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

impl<K: Eq + Hash, V> FidelityPool<K, V> {
    /// Returns the table registered for `id`, if any.
    #[must_use]
    pub fn table(&self, id: MogramId) -> Option<&KeyedTable<K, V>> {
        self.tables.get(&id)
    }

    /// Returns a mutable reference to the table registered for `id`, if any.
    pub fn table_mut(&mut self, id: MogramId) -> Option<&mut KeyedTable<K, V>> {
        self.tables.get_mut(&id)
    }

    /// Registers (or replaces) the whole table for `id`, returning the prior one.
    pub fn insert_table(&mut self, id: MogramId, table: KeyedTable<K, V>) -> Option<KeyedTable<K, V>> {
        self.tables.insert(id, table)
    }

    /// Returns the table for `id`, creating an empty one lazily.
    ///
    /// A lazily created table inherits the pool's selection mode.
    pub fn table_or_default(&mut self, id: MogramId) -> &mut KeyedTable<K, V> {
        let mode = self.mode;
        self.tables
            .entry(id)
            .or_insert_with(|| KeyedTable::with_mode(mode))
    }

    /// Removes and returns the table for `id`, if any.
    pub fn remove_table(&mut self, id: MogramId) -> Option<KeyedTable<K, V>> {
        self.tables.remove(&id)
    }

    /// Returns true if `id` has a registered table (possibly empty).
    #[must_use]
    pub fn contains_mogram(&self, id: MogramId) -> bool {
        self.tables.contains_key(&id)
    }

    /// Two-level insert: puts `value` under `key` in the table for `id`.
    ///
    /// Creates the table lazily. Returns the prior value under `key`.
    pub fn put(&mut self, id: MogramId, key: K, value: V) -> Option<V> {
        self.table_or_default(id).put(key, value)
    }

    /// Two-level lookup: the value under `key` in the table for `id`.
    #[must_use]
    pub fn get(&self, id: MogramId, key: &K) -> Option<&V> {
        self.tables.get(&id).and_then(|t| t.get(key))
    }
}

impl<K: Eq + Hash, V> Default for FidelityPool<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::identity::Fidelity;

    #[test]
    fn tables_are_isolated_per_mogram() {
        let mut pool: FidelityPool<Fidelity, Fidelity> = FidelityPool::new();
        let x = MogramId::new();
        let y = MogramId::new();

        pool.put(x, Fidelity::new("step"), Fidelity::new("fast"));
        pool.put(y, Fidelity::new("step"), Fidelity::new("exact"));

        assert_eq!(
            pool.get(x, &Fidelity::new("step")),
            Some(&Fidelity::new("fast"))
        );
        assert_eq!(
            pool.get(y, &Fidelity::new("step")),
            Some(&Fidelity::new("exact"))
        );
        assert_eq!(pool.mogram_count(), 2);

        // A third identity sees nothing.
        assert_eq!(pool.get(MogramId::new(), &Fidelity::new("step")), None);
    }

    #[test]
    fn absent_table_is_distinct_from_empty_table() {
        let mut pool: FidelityPool<String, u32> = FidelityPool::new();
        let id = MogramId::new();

        assert!(pool.table(id).is_none());
        assert!(!pool.contains_mogram(id));

        pool.insert_table(id, KeyedTable::new());
        let table = pool.table(id).expect("registered table must be present");
        assert!(table.is_empty());
        assert!(pool.contains_mogram(id));
    }

    #[test]
    fn insert_table_replaces_wholesale() {
        let mut pool: FidelityPool<String, u32> = FidelityPool::new();
        let id = MogramId::new();

        let mut first = KeyedTable::new();
        first.put("a".to_string(), 1);
        pool.insert_table(id, first);

        let mut second = KeyedTable::new();
        second.put("b".to_string(), 2);
        let prior = pool.insert_table(id, second).expect("prior table returned");
        assert_eq!(prior.get(&"a".to_string()), Some(&1));

        // Only the replacement is visible.
        assert_eq!(pool.get(id, &"a".to_string()), None);
        assert_eq!(pool.get(id, &"b".to_string()), Some(&2));
    }

    #[test]
    fn lazily_created_tables_inherit_pool_mode() {
        let mut pool: FidelityPool<String, u32> = FidelityPool::with_mode(SelectionMode::All);
        let id = MogramId::new();

        let table = pool.table_or_default(id);
        assert_eq!(table.mode(), SelectionMode::All);

        // Changing the pool tag later does not rewrite existing tables.
        pool.set_mode(SelectionMode::Select);
        assert_eq!(pool.table(id).unwrap().mode(), SelectionMode::All);
    }

    #[test]
    fn remove_and_clear_drop_tables() {
        let mut pool: FidelityPool<String, u32> = FidelityPool::new();
        let a = MogramId::new();
        let b = MogramId::new();

        pool.put(a, "k".to_string(), 1);
        pool.put(b, "k".to_string(), 2);

        let removed = pool.remove_table(a).expect("table for a");
        assert_eq!(removed.get(&"k".to_string()), Some(&1));
        assert!(pool.table(a).is_none());
        assert_eq!(pool.mogram_count(), 1);

        pool.clear();
        assert!(pool.is_empty());
    }

    #[test]
    fn serde_round_trip_preserves_tables_and_mode() {
        let mut pool: FidelityPool<String, u32> = FidelityPool::with_mode(SelectionMode::All);
        let id = MogramId::new();
        pool.put(id, "k".to_string(), 7);

        let json = serde_json::to_string(&pool).unwrap();
        let back: FidelityPool<String, u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mode(), SelectionMode::All);
        assert_eq!(back.get(id, &"k".to_string()), Some(&7));
    }
}
