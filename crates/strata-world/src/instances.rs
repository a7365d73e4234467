//! Dense instance arena with O(1) swap-remove.
//!
//! Instances live in a contiguous array so a renderer can upload them as one
//! buffer. Removing from the middle moves the last instance into the hole;
//! the caller is told which key moved so it can update its back-reference.

use std::hash::Hash;

use rustc_hash::FxHashMap;

/// Result of [`InstanceArena::remove`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapRemoval<K> {
    /// Index the removed key occupied.
    pub removed: u32,
    /// The key that was moved into `removed`, with its new index.
    pub moved: Option<(K, u32)>,
}

/// Maps keys to dense instance indices.
#[derive(Clone, Debug)]
pub struct InstanceArena<K> {
    slots: Vec<K>,
    index: FxHashMap<K, u32>,
}

impl<K: Copy + Eq + Hash> InstanceArena<K> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: FxHashMap::default(),
        }
    }

    /// Appends `key` and returns its index. An existing key keeps its index.
    pub fn insert(&mut self, key: K) -> u32 {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.slots.len() as u32;
        self.slots.push(key);
        self.index.insert(key, i);
        i
    }

    /// Removes `key`, filling its slot with the last instance.
    pub fn remove(&mut self, key: K) -> Option<SwapRemoval<K>> {
        let removed = self.index.remove(&key)?;
        self.slots.swap_remove(removed as usize);
        let moved = self.slots.get(removed as usize).copied().map(|moved_key| {
            self.index.insert(moved_key, removed);
            (moved_key, removed)
        });
        Some(SwapRemoval { removed, moved })
    }

    pub fn index_of(&self, key: K) -> Option<u32> {
        self.index.get(&key).copied()
    }

    pub fn contains(&self, key: K) -> bool {
        self.index.contains_key(&key)
    }

    /// Key stored at `index`.
    pub fn key_at(&self, index: u32) -> Option<K> {
        self.slots.get(index as usize).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Keys in instance order.
    pub fn keys(&self) -> &[K] {
        &self.slots
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for InstanceArena<K> {
    fn default() -> Self {
        Self::new()
    }
}
