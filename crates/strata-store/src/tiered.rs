use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use strata_types::BlockCid;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// Two-tier block store: a fast cache in front of a durable store.
///
/// Reads are cache-first; a durable hit re-populates the cache before the
/// bytes are returned (write-back on miss). Writes go to both tiers, and
/// the call only succeeds once the durable tier has accepted the block
/// (write-through). Existence checks consult the cache, then the durable
/// tier, without moving any bytes.
///
/// The tiers are injected at construction and only ever used through the
/// [`BlockStore`] contract, so either side can be swapped: a different
/// cache policy, a different durable backend, or a test double.
///
/// Tier divergence is tolerated by design. The cache is advisory: a cache
/// write that fails is logged and ignored, on both the `put` path and the
/// write-back path, because the durable tier alone decides the outcome and
/// cached content is always reconstructible. The one asymmetry: a failed
/// durable write fails the `put` but leaves any cache entry in place — the
/// bytes are correct by construction and the durable failure is likely
/// transient.
pub struct TieredBlockStore {
    cache: Arc<dyn BlockStore>,
    durable: Arc<dyn BlockStore>,
}

impl TieredBlockStore {
    /// Compose a cache tier and a durable tier.
    pub fn new(cache: Arc<dyn BlockStore>, durable: Arc<dyn BlockStore>) -> Self {
        Self { cache, durable }
    }

    /// The cache tier.
    pub fn cache(&self) -> &Arc<dyn BlockStore> {
        &self.cache
    }

    /// The durable tier.
    pub fn durable(&self) -> &Arc<dyn BlockStore> {
        &self.durable
    }
}

#[async_trait]
impl BlockStore for TieredBlockStore {
    async fn get(&self, cid: &BlockCid) -> StoreResult<Bytes> {
        match self.cache.get(cid).await {
            Ok(data) => {
                tracing::trace!(cid = %cid.short_text(), "cache hit");
                return Ok(data);
            }
            Err(StoreError::NotFound(_)) => {}
            Err(e) => {
                // A failing cache tier must not mask durable content.
                tracing::warn!(cid = %cid.short_text(), error = %e, "cache read failed, falling through");
            }
        }

        let data = self.durable.get(cid).await?;
        tracing::debug!(cid = %cid.short_text(), size = data.len(), "durable hit, populating cache");
        if let Err(e) = self.cache.put(cid, data.clone()).await {
            tracing::warn!(cid = %cid.short_text(), error = %e, "cache populate failed");
        }
        Ok(data)
    }

    async fn put(&self, cid: &BlockCid, data: Bytes) -> StoreResult<()> {
        if let Err(e) = self.cache.put(cid, data.clone()).await {
            tracing::warn!(cid = %cid.short_text(), error = %e, "cache write failed");
        }
        self.durable.put(cid, data).await?;
        tracing::debug!(cid = %cid.short_text(), "block written through");
        Ok(())
    }

    async fn has(&self, cid: &BlockCid) -> StoreResult<bool> {
        if self.cache.has(cid).await.unwrap_or(false) {
            return Ok(true);
        }
        self.durable.has(cid).await
    }
}

impl std::fmt::Debug for TieredBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredBlockStore").finish_non_exhaustive()
    }
}
