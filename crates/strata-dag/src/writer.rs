use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use strata_store::BlockStore;
use strata_types::BlockCid;

use crate::error::DagResult;
use crate::manifest::{ChildRef, ManifestNode};

/// Default chunk size for object ingestion: 256 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 256 * 1024;

/// Streaming object writer: a fold from a byte stream to a root CID.
///
/// Bytes are pushed in any increments; each time a full chunk accumulates
/// it is flushed to the block store as a raw leaf block, so memory held by
/// the writer never exceeds one chunk. `finish()` flushes the tail chunk,
/// writes the manifest root if more than one chunk was emitted, and
/// returns the root CID with the total byte count.
pub struct ObjectWriter {
    store: Arc<dyn BlockStore>,
    chunk_size: usize,
    buf: BytesMut,
    children: Vec<ChildRef>,
    total: u64,
}

impl ObjectWriter {
    /// Create a writer with the default chunk size.
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self::with_chunk_size(store, DEFAULT_CHUNK_SIZE)
    }

    /// Create a writer with an explicit chunk size.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is zero.
    pub fn with_chunk_size(store: Arc<dyn BlockStore>, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            store,
            chunk_size,
            buf: BytesMut::new(),
            children: Vec::new(),
            total: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn bytes_written(&self) -> u64 {
        self.total + self.buf.len() as u64
    }

    /// Append bytes, flushing any chunks that fill.
    pub async fn push(&mut self, data: &[u8]) -> DagResult<()> {
        self.buf.extend_from_slice(data);
        while self.buf.len() >= self.chunk_size {
            let chunk = self.buf.split_to(self.chunk_size).freeze();
            self.flush_chunk(chunk).await?;
        }
        Ok(())
    }

    /// Seal the object: flush the tail, write the root if needed, and
    /// return `(root_cid, total_size)`.
    pub async fn finish(mut self) -> DagResult<(BlockCid, u64)> {
        if !self.buf.is_empty() {
            let chunk = std::mem::take(&mut self.buf).freeze();
            self.flush_chunk(chunk).await?;
        }

        match self.children.len() {
            // Empty object: the raw block of the empty byte string.
            0 => {
                let cid = BlockCid::identify(b"");
                self.store.put(&cid, Bytes::new()).await?;
                Ok((cid, 0))
            }
            // Single chunk: the leaf IS the object, no manifest.
            1 => Ok((self.children[0].cid, self.total)),
            _ => {
                let manifest = ManifestNode::new(self.children);
                let block = manifest.to_block()?;
                let root = *block.cid();
                self.store.put(&root, block.into_data()).await?;
                tracing::debug!(
                    root = %root.short_text(),
                    children = manifest.len(),
                    size = self.total,
                    "manifest root written"
                );
                Ok((root, self.total))
            }
        }
    }

    async fn flush_chunk(&mut self, chunk: Bytes) -> DagResult<()> {
        let size = chunk.len() as u64;
        let cid = BlockCid::identify(&chunk);
        self.store.put(&cid, chunk).await?;
        self.children.push(ChildRef { cid, size });
        self.total += size;
        Ok(())
    }
}
