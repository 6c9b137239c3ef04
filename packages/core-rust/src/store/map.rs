//! Typed, prefix-scoped map view over a [`StoreEngine`].
//!
//! [`StoreMap`] is the collection abstraction module handlers program
//! against: a string-keyed map of one record type, stored under a module
//! prefix. Values are encoded as named-field MessagePack via `rmp-serde`, so
//! records tolerate field reordering across versions.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::engine::{StoreEngine, StoreError};

/// Entries fetched per engine round-trip while walking.
const WALK_BATCH: usize = 128;

/// String-keyed record collection under a fixed prefix.
///
/// Cheap to clone; clones share the underlying engine.
pub struct StoreMap<V> {
    engine: Arc<dyn StoreEngine>,
    prefix: Vec<u8>,
    _value: PhantomData<fn() -> V>,
}

impl<V> Clone for StoreMap<V> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            prefix: self.prefix.clone(),
            _value: PhantomData,
        }
    }
}

impl<V> StoreMap<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Creates a map view for `prefix` on the shared engine.
    #[must_use]
    pub fn new(engine: Arc<dyn StoreEngine>, prefix: &str) -> Self {
        Self {
            engine,
            prefix: prefix.as_bytes().to_vec(),
            _value: PhantomData,
        }
    }

    fn full_key(&self, key: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + key.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(key.as_bytes());
        out
    }

    fn strip_prefix<'k>(&self, full: &'k [u8]) -> Result<&'k str, StoreError> {
        let tail = full
            .get(self.prefix.len()..)
            .ok_or_else(|| StoreError::Codec("key shorter than prefix".to_string()))?;
        std::str::from_utf8(tail).map_err(|e| StoreError::Codec(e.to_string()))
    }

    fn decode(&self, key: &str, bytes: &[u8]) -> Result<V, StoreError> {
        rmp_serde::from_slice(bytes)
            .map_err(|e| StoreError::Codec(format!("value at {key:?}: {e}")))
    }

    /// Whether `key` is present.
    ///
    /// # Errors
    ///
    /// Only on an underlying storage fault.
    pub fn has(&self, key: &str) -> Result<bool, StoreError> {
        self.engine.has(&self.full_key(key))
    }

    /// Fetch the record at `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] if the key is absent.
    pub fn get(&self, key: &str) -> Result<V, StoreError> {
        let bytes = self
            .engine
            .get(&self.full_key(key))?
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        self.decode(key, &bytes)
    }

    /// Insert or replace the record at `key`. Overwrites unconditionally.
    ///
    /// # Errors
    ///
    /// On encode failure or an underlying storage fault.
    pub fn set(&self, key: &str, value: &V) -> Result<(), StoreError> {
        let bytes =
            rmp_serde::to_vec_named(value).map_err(|e| StoreError::Codec(e.to_string()))?;
        tracing::trace!(key, "store map set");
        self.engine.set(&self.full_key(key), &bytes)
    }

    /// Remove the record at `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Only on an underlying storage fault.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        tracing::trace!(key, "store map remove");
        self.engine.remove(&self.full_key(key))
    }

    /// Fetch up to `limit` records in ascending key order, starting strictly
    /// after `start_after` when given. Restartable with the last returned key.
    ///
    /// # Errors
    ///
    /// On decode failure or an underlying storage fault.
    pub fn scan_after(
        &self,
        start_after: Option<&str>,
        limit: usize,
    ) -> Result<Vec<(String, V)>, StoreError> {
        let start = start_after.map(|k| self.full_key(k));
        let raw = self.engine.scan(&self.prefix, start.as_deref(), limit)?;

        let mut out = Vec::with_capacity(raw.len());
        for (full_key, bytes) in raw {
            let key = self.strip_prefix(&full_key)?.to_string();
            let value = self.decode(&key, &bytes)?;
            out.push((key, value));
        }
        Ok(out)
    }

    /// Visit every record in ascending key order.
    ///
    /// The visitor returns `true` to halt early. Entries are fetched in
    /// batches, so the full collection is never materialized at once.
    ///
    /// # Errors
    ///
    /// On decode failure or an underlying storage fault.
    pub fn walk<F>(&self, mut visit: F) -> Result<(), StoreError>
    where
        F: FnMut(&str, V) -> bool,
    {
        let mut cursor: Option<String> = None;
        loop {
            let batch = self.scan_after(cursor.as_deref(), WALK_BATCH)?;
            if batch.is_empty() {
                return Ok(());
            }
            let full = batch.len() == WALK_BATCH;
            for (key, value) in batch {
                let stop = visit(&key, value);
                cursor = Some(key);
                if stop {
                    return Ok(());
                }
            }
            if !full {
                return Ok(());
            }
        }
    }

    /// Exact number of live records in the map.
    ///
    /// # Errors
    ///
    /// Only on an underlying storage fault.
    pub fn count(&self) -> Result<u64, StoreError> {
        self.engine.count(&self.prefix)
    }
}

/// Single typed record stored at a fixed key, for per-module parameters.
pub struct StoreItem<V> {
    engine: Arc<dyn StoreEngine>,
    key: Vec<u8>,
    _value: PhantomData<fn() -> V>,
}

impl<V> StoreItem<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Creates an item view for `key` on the shared engine.
    #[must_use]
    pub fn new(engine: Arc<dyn StoreEngine>, key: &str) -> Self {
        Self {
            engine,
            key: key.as_bytes().to_vec(),
            _value: PhantomData,
        }
    }

    /// Fetch the stored value, or `None` if it was never set.
    ///
    /// # Errors
    ///
    /// On decode failure or an underlying storage fault.
    pub fn get(&self) -> Result<Option<V>, StoreError> {
        match self.engine.get(&self.key)? {
            None => Ok(None),
            Some(bytes) => rmp_serde::from_slice(&bytes)
                .map(Some)
                .map_err(|e| StoreError::Codec(e.to_string())),
        }
    }

    /// Store the value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// On encode failure or an underlying storage fault.
    pub fn set(&self, value: &V) -> Result<(), StoreError> {
        let bytes =
            rmp_serde::to_vec_named(value).map_err(|e| StoreError::Codec(e.to_string()))?;
        self.engine.set(&self.key, &bytes)
    }
}
