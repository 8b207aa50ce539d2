use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use strata_types::BlockCid;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// In-memory, HashMap-based block store.
///
/// Serves as the cache tier of [`TieredBlockStore`] and as a standalone
/// store for tests and embedding. Blocks are held behind a `RwLock`;
/// `Bytes` makes reads cheap clones. The lock is never held across an
/// await point.
///
/// [`TieredBlockStore`]: crate::tiered::TieredBlockStore
pub struct MemoryBlockStore {
    blocks: RwLock<HashMap<BlockCid, Bytes>>,
}

impl MemoryBlockStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Synchronous existence check (no async hop for callers holding a
    /// concrete `MemoryBlockStore`).
    pub fn contains(&self, cid: &BlockCid) -> bool {
        self.blocks.read().expect("lock poisoned").contains_key(cid)
    }

    /// Remove a single block. Returns `true` if it was present.
    ///
    /// Cache eviction policy is a noted extension; this is the primitive
    /// it would build on, and what tests use to simulate a cold cache.
    pub fn remove(&self, cid: &BlockCid) -> bool {
        self.blocks.write().expect("lock poisoned").remove(cid).is_some()
    }

    /// Remove all blocks from the store.
    pub fn clear(&self) {
        self.blocks.write().expect("lock poisoned").clear();
    }
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockStore for MemoryBlockStore {
    async fn get(&self, cid: &BlockCid) -> StoreResult<Bytes> {
        let map = self.blocks.read().expect("lock poisoned");
        map.get(cid).cloned().ok_or(StoreError::NotFound(*cid))
    }

    async fn put(&self, cid: &BlockCid, data: Bytes) -> StoreResult<()> {
        let mut map = self.blocks.write().expect("lock poisoned");
        // Idempotent: an existing entry is identical by construction.
        map.entry(*cid).or_insert(data);
        Ok(())
    }

    async fn has(&self, cid: &BlockCid) -> StoreResult<bool> {
        Ok(self.contains(cid))
    }
}

impl std::fmt::Debug for MemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlockStore")
            .field("block_count", &self.len())
            .finish()
    }
}
