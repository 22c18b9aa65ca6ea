use std::collections::HashMap;
use std::hash::Hash;

use log::debug;

pub struct ResourceCache<K, V> {
    entries: HashMap<K, V>,
    misses: u64,
}

impl<K, V> Default for ResourceCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            misses: 0,
        }
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Debug, V> ResourceCache<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn get_or_insert_with<F>(&mut self, key: K, create: F) -> &V
    where
        F: FnOnce(&K) -> V,
    {
        if !self.entries.contains_key(&key) {
            debug!("resource cache miss: {:?}", key);
            self.misses += 1;
        }
        self.entries.entry(key).or_insert_with(|| create(&key))
    }

    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
