use std::collections::HashMap;
use std::hash::Hash;

/// Counts keyed values, remembering the order in which keys were first seen.
///
/// Built fresh for each aggregate so repeated calls never share state.
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, usize)>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    pub fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Adds one to `key`, returning its insertion position.
    pub fn bump(&mut self, key: &K) -> usize {
        self.add(key, 1)
    }

    fn add(&mut self, key: &K, amount: usize) -> usize {
        match self.index.get(key) {
            Some(&pos) => {
                self.entries[pos].1 += amount;
                pos
            }
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key.clone(), amount));
                pos
            }
        }
    }

    /// Entries in first-seen order.
    pub fn into_entries(self) -> Vec<(K, usize)> {
        self.entries
    }

    /// Entries sorted by count descending. The sort is stable, so equal
    /// counts keep first-seen order.
    pub fn into_ranked(self) -> Vec<(K, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}
