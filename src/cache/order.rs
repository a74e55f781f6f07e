//! Key Order Module
//!
//! Remembers the order in which keys first entered the store.

use std::collections::{HashSet, VecDeque};

// == Key Order ==
/// Tracks first-insertion order of keys.
///
/// Keys are stored in a VecDeque where:
/// - Front = Oldest insertion
/// - Back = Newest insertion
///
/// Overwriting a key does not move it; a key only moves to the back after it
/// has been removed and inserted again.
#[derive(Debug, Default)]
pub struct KeyOrder {
    order: VecDeque<String>,
}

impl KeyOrder {
    // == Constructor ==
    /// Creates an empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Push ==
    /// Appends a newly inserted key. The caller guarantees it is not tracked.
    pub fn push(&mut self, key: &str) {
        self.order.push_back(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    // == Remove All ==
    /// Removes every key in `keys` in a single pass.
    pub fn remove_all(&mut self, keys: &HashSet<String>) {
        self.order.retain(|k| !keys.contains(k));
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.order.clear();
    }

    // == Snapshot ==
    /// Returns tracked keys oldest first.
    pub fn to_vec(&self) -> Vec<String> {
        self.order.iter().cloned().collect()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
