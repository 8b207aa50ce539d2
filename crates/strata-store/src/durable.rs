use async_trait::async_trait;
use bytes::Bytes;
use strata_types::BlockCid;

use crate::error::{StoreError, StoreResult};
use crate::traits::{BlobBackend, BlockStore};

/// Key namespace for blocks in the durable backend.
const KEY_PREFIX: &str = "blocks";

/// Durable tier: a [`BlockStore`] over an abstract [`BlobBackend`].
///
/// Blocks are keyed `blocks/<canonical-cid>` and stored as raw bytes with
/// no metadata envelope, so the layout is readable by any tool that can
/// list the backend.
pub struct BackendBlockStore<B> {
    backend: B,
}

impl<B: BlobBackend> BackendBlockStore<B> {
    /// Wrap a blob backend as the durable block tier.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The storage key for a CID.
    pub fn block_key(cid: &BlockCid) -> String {
        format!("{KEY_PREFIX}/{}", cid.to_canonical())
    }

    /// Access the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: BlobBackend> BlockStore for BackendBlockStore<B> {
    async fn get(&self, cid: &BlockCid) -> StoreResult<Bytes> {
        let key = Self::block_key(cid);
        match self.backend.fetch(&key).await? {
            Some(data) => Ok(data),
            None => Err(StoreError::NotFound(*cid)),
        }
    }

    async fn put(&self, cid: &BlockCid, data: Bytes) -> StoreResult<()> {
        let key = Self::block_key(cid);
        self.backend.store(&key, data).await?;
        Ok(())
    }

    async fn has(&self, cid: &BlockCid) -> StoreResult<bool> {
        let key = Self::block_key(cid);
        Ok(self.backend.exists(&key).await?)
    }
}

impl<B: std::fmt::Debug> std::fmt::Debug for BackendBlockStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendBlockStore")
            .field("backend", &self.backend)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBlobBackend;
    use crate::error::BackendError;

    #[tokio::test]
    async fn keys_are_namespaced_canonical_text() {
        let data = Bytes::from_static(b"layout check");
        let cid = BlockCid::identify(&data);
        let key = BackendBlockStore::<MemoryBlobBackend>::block_key(&cid);
        assert_eq!(key, format!("blocks/{}", cid.to_canonical()));
    }

    #[tokio::test]
    async fn put_stores_raw_bytes_under_block_key() {
        let store = BackendBlockStore::new(MemoryBlobBackend::new());
        let data = Bytes::from_static(b"raw, no envelope");
        let cid = BlockCid::identify(&data);

        store.put(&cid, data.clone()).await.unwrap();

        let key = BackendBlockStore::<MemoryBlobBackend>::block_key(&cid);
        let stored = store.backend().fetch(&key).await.unwrap();
        assert_eq!(stored, Some(data));
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let store = BackendBlockStore::new(MemoryBlobBackend::new());
        let cid = BlockCid::identify(b"absent");
        let err = store.get(&cid).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(c) if c == cid));
    }

    #[tokio::test]
    async fn backend_failure_is_not_a_miss() {
        let store = BackendBlockStore::new(MemoryBlobBackend::new());
        let cid = BlockCid::identify(b"unreachable");

        store.backend().set_unavailable(true);
        let err = store.get(&cid).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(BackendError::Unavailable(_))));
    }

    #[tokio::test]
    async fn has_roundtrip() {
        let store = BackendBlockStore::new(MemoryBlobBackend::new());
        let data = Bytes::from_static(b"exists");
        let cid = BlockCid::identify(&data);

        assert!(!store.has(&cid).await.unwrap());
        store.put(&cid, data).await.unwrap();
        assert!(store.has(&cid).await.unwrap());
    }
}
