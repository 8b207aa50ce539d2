use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use strata_store::BlockStore;
use strata_types::{Block, BlockCid, BlockCodec};

use crate::error::{DagError, DagResult};
use crate::manifest::{ChildRef, ManifestNode};

/// Streaming object reader: walks an object graph back into bytes.
///
/// `open` resolves and verifies the root block eagerly, so an unknown or
/// unreadable root surfaces before any bytes are produced. `next_chunk`
/// then yields chunks in stored order, fetching one child block at a time;
/// a dropped reader holds no in-flight store requests.
///
/// The reader is single-pass. Once it has completed or failed it only
/// returns `None`; a new reader is required to re-read the object.
pub struct ObjectReader {
    store: Arc<dyn BlockStore>,
    state: ReaderState,
}

impl std::fmt::Debug for ObjectReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectReader")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
enum ReaderState {
    /// Single-block object, chunk not yet emitted.
    Leaf { data: Bytes },
    /// Multi-block object, remaining children to emit.
    Manifest { children: VecDeque<ChildRef> },
    Completed,
    Failed,
}

impl ObjectReader {
    /// Resolve the root block of `root` and prepare to stream its content.
    pub async fn open(store: Arc<dyn BlockStore>, root: BlockCid) -> DagResult<Self> {
        let data = store.get(&root).await?;
        if Block::from_parts(root, data.clone()).is_err() {
            return Err(DagError::IntegrityMismatch { cid: root });
        }

        let state = match root.codec() {
            BlockCodec::Raw => ReaderState::Leaf { data },
            BlockCodec::Manifest => {
                let manifest = ManifestNode::from_bytes(&root, &data)?;
                tracing::debug!(
                    root = %root.short_text(),
                    children = manifest.len(),
                    size = manifest.size,
                    "streaming manifest object"
                );
                ReaderState::Manifest {
                    children: manifest.children.into(),
                }
            }
        };
        Ok(Self { store, state })
    }

    /// Yield the next chunk, `Some(Err(..))` exactly once on failure, or
    /// `None` after the object has fully streamed or failed.
    pub async fn next_chunk(&mut self) -> Option<DagResult<Bytes>> {
        match std::mem::replace(&mut self.state, ReaderState::Completed) {
            ReaderState::Leaf { data } => Some(Ok(data)),
            ReaderState::Manifest { mut children } => {
                let Some(child) = children.pop_front() else {
                    return None;
                };
                match self.fetch_child(&child).await {
                    Ok(data) => {
                        self.state = ReaderState::Manifest { children };
                        Some(Ok(data))
                    }
                    Err(e) => {
                        self.state = ReaderState::Failed;
                        Some(Err(e))
                    }
                }
            }
            ReaderState::Completed => None,
            ReaderState::Failed => {
                self.state = ReaderState::Failed;
                None
            }
        }
    }

    async fn fetch_child(&self, child: &ChildRef) -> DagResult<Bytes> {
        let data = self.store.get(&child.cid).await?;
        if Block::from_parts(child.cid, data.clone()).is_err() {
            return Err(DagError::IntegrityMismatch { cid: child.cid });
        }
        Ok(data)
    }
}
