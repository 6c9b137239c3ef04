//! In-memory [`StoreEngine`] backed by a [`BTreeMap`].
//!
//! The ordered map gives ascending-key iteration for free, which is the
//! property the paginator and genesis export rely on. A single
//! [`parking_lot::RwLock`] guards the tree: queries take read locks and may
//! run concurrently, while the runtime serializes all writers above this
//! layer.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::engine::{StoreEngine, StoreError};

/// In-memory ordered storage. Never faults.
pub struct MemStore {
    entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemStore {
    /// Creates a new, empty `MemStore`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Total number of entries across all prefixes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the store holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreEngine for MemStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn has(&self, key: &[u8]) -> Result<bool, StoreError> {
        Ok(self.entries.read().contains_key(key))
    }

    fn remove(&self, key: &[u8]) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn scan(
        &self,
        prefix: &[u8],
        start_after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        // A start point below the prefix region degenerates to a scan from
        // the start of the prefix.
        let lower: Bound<Vec<u8>> = match start_after {
            Some(k) if k >= prefix => Bound::Excluded(k.to_vec()),
            _ => Bound::Included(prefix.to_vec()),
        };

        let guard = self.entries.read();
        let items = guard
            .range((lower, Bound::Unbounded))
            .take_while(|(k, _)| k.starts_with(prefix))
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(items)
    }

    fn count(&self, prefix: &[u8]) -> Result<u64, StoreError> {
        let guard = self.entries.read();
        let n = guard
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .count();
        Ok(n as u64)
    }
}
