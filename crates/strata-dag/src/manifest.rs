use serde::{Deserialize, Serialize};
use strata_types::{Block, BlockCid, BlockCodec};

use crate::error::{DagError, DagResult};

/// Reference to one chunk of a multi-block object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    /// CID of the raw leaf block.
    pub cid: BlockCid,
    /// Size of the leaf block in bytes.
    pub size: u64,
}

/// Root node of a multi-block object: the ordered list of leaf blocks.
///
/// Serialized as JSON, which is also the root CID's payload codec, so the
/// node is self-describing: any consumer that can parse the CID knows how
/// to decode the block behind it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestNode {
    /// Child blocks in emission order.
    pub children: Vec<ChildRef>,
    /// Total object size in bytes (sum of child sizes).
    pub size: u64,
}

impl ManifestNode {
    /// Build a manifest over the given children.
    pub fn new(children: Vec<ChildRef>) -> Self {
        let size = children.iter().map(|c| c.size).sum();
        Self { children, size }
    }

    /// Number of child blocks.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns `true` if the manifest has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Encode into a manifest block.
    pub fn to_block(&self) -> DagResult<Block> {
        let data = serde_json::to_vec(self).map_err(|e| DagError::Serialization(e.to_string()))?;
        Ok(Block::with_codec(BlockCodec::Manifest, data.into()))
    }

    /// Decode a manifest from the bytes stored under `cid`.
    pub fn from_bytes(cid: &BlockCid, data: &[u8]) -> DagResult<Self> {
        serde_json::from_slice(data).map_err(|e| DagError::CorruptManifest {
            cid: *cid,
            reason: e.to_string(),
        })
    }
}
