//! Insertion-ordered record table shared by the in-memory stores.

use std::collections::HashMap;
use std::hash::Hash;

/// Records keyed by id, plus the order in which they were inserted.
///
/// `order` holds ids only; `records` is the single source of truth.
#[derive(Debug)]
pub(crate) struct Table<K, V> {
    records: HashMap<K, V>,
    order: Vec<K>,
}

impl<K: Copy + Eq + Hash, V: Clone> Table<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: K, value: V) {
        if self.records.insert(key, value).is_none() {
            self.order.push(key);
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.records.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.records.get_mut(key)
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        let removed = self.records.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Clones of the records accepted by `keep`, in insertion order.
    pub(crate) fn collect(&self, keep: impl Fn(&V) -> bool) -> Vec<V> {
        self.order
            .iter()
            .filter_map(|k| self.records.get(k))
            .filter(|v| keep(v))
            .cloned()
            .collect()
    }
}
