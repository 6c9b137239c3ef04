//! Ordered key-value engine trait and store-layer errors.
//!
//! Defines [`StoreEngine`], the innermost storage layer: a byte-keyed,
//! byte-valued mapping iterated in ascending key order. One engine backs a
//! whole app; modules carve out disjoint key ranges via the prefixes of
//! [`StoreMap`](super::StoreMap) and [`StoreItem`](super::StoreItem).
//!
//! Atomicity of a single `set`/`remove` within a larger command is the
//! enclosing runtime's concern: the runtime executes commands sequentially,
//! so no engine-level transaction support is exposed here.

/// Failure at the store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested key is absent.
    #[error("key not found: {0}")]
    NotFound(String),

    /// A stored value failed to encode or decode.
    #[error("codec failure: {0}")]
    Codec(String),

    /// The underlying storage backend faulted.
    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Byte-keyed ordered storage.
///
/// All operations are synchronous; implementations provide their own interior
/// locking. Every method returns `Result` to carry the storage-fault channel
/// even when a given backend (like [`MemStore`](super::MemStore)) cannot fail.
///
/// Wrapped in `Arc<dyn StoreEngine>` for sharing across modules.
pub trait StoreEngine: Send + Sync + 'static {
    /// Retrieve the value stored at `key`, or `None` if absent.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace the value at `key`. Overwrites unconditionally.
    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;

    /// Check whether `key` is present.
    fn has(&self, key: &[u8]) -> Result<bool, StoreError>;

    /// Remove the value at `key`. Removing an absent key is a no-op; callers
    /// enforcing not-found semantics check existence first.
    fn remove(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Fetch up to `limit` entries under `prefix` in ascending key order,
    /// starting strictly after `start_after` when given.
    ///
    /// Restartable: passing the last returned key as `start_after` resumes
    /// the scan. A `limit` of zero yields no entries.
    fn scan(
        &self,
        prefix: &[u8],
        start_after: Option<&[u8]>,
        limit: usize,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Exact number of live entries under `prefix`.
    fn count(&self, prefix: &[u8]) -> Result<u64, StoreError>;
}
