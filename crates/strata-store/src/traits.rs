use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use strata_types::BlockCid;

use crate::error::{BackendResult, StoreResult};

/// Content-addressed block store.
///
/// All implementations must satisfy these invariants:
/// - Blocks are immutable once written. Content-addressing guarantees this:
///   the same bytes always produce the same CID.
/// - `get` for a missing CID returns [`StoreError::NotFound`], and a backend
///   failure returns [`StoreError::Backend`] — callers can always tell the
///   two apart.
/// - `put` is idempotent: re-writing an existing CID is a no-op.
/// - `has` never fetches block bytes and never populates a cache.
/// - Concurrent operations on different CIDs do not block each other.
///
/// [`StoreError::NotFound`]: crate::error::StoreError::NotFound
/// [`StoreError::Backend`]: crate::error::StoreError::Backend
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// Read a block's bytes by CID.
    async fn get(&self, cid: &BlockCid) -> StoreResult<Bytes>;

    /// Write a block under its CID.
    async fn put(&self, cid: &BlockCid, data: Bytes) -> StoreResult<()>;

    /// Check whether a block exists, without fetching its bytes.
    async fn has(&self, cid: &BlockCid) -> StoreResult<bool>;
}

/// Abstract durable key-value blob service.
///
/// This is the boundary to the remote object store: Strata only needs
/// fetch/store/exists over opaque string keys. The backend persists values
/// across process restarts; it never interprets them.
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Fetch a value. `Ok(None)` means the key does not exist; `Err` means
    /// the backend could not answer.
    async fn fetch(&self, key: &str) -> BackendResult<Option<Bytes>>;

    /// Store a value under a key, overwriting any previous value.
    async fn store(&self, key: &str, value: Bytes) -> BackendResult<()>;

    /// Check whether a key exists without fetching its value.
    async fn exists(&self, key: &str) -> BackendResult<bool>;
}

#[async_trait]
impl<T: BlobBackend + ?Sized> BlobBackend for Arc<T> {
    async fn fetch(&self, key: &str) -> BackendResult<Option<Bytes>> {
        (**self).fetch(key).await
    }

    async fn store(&self, key: &str, value: Bytes) -> BackendResult<()> {
        (**self).store(key, value).await
    }

    async fn exists(&self, key: &str) -> BackendResult<bool> {
        (**self).exists(key).await
    }
}
