use bytes::Bytes;

use crate::content_id::{BlockCid, BlockCodec};
use crate::error::{TypeError, TypeResult};

/// An immutable content-addressed byte sequence, the atomic storage unit.
///
/// The CID is derived from the data at construction, so a `Block` is
/// self-verifying: re-hashing the data always reproduces the CID.
#[derive(Clone, PartialEq, Eq)]
pub struct Block {
    cid: BlockCid,
    data: Bytes,
}

impl Block {
    /// Create a raw block, deriving its CID from the data.
    pub fn new(data: Bytes) -> Self {
        let cid = BlockCid::identify(&data);
        Self { cid, data }
    }

    /// Create a block under a specific payload codec.
    pub fn with_codec(codec: BlockCodec, data: Bytes) -> Self {
        let cid = BlockCid::identify_with(codec, &data);
        Self { cid, data }
    }

    /// Reassemble a block from a known CID and bytes, verifying that the
    /// bytes actually hash to that CID.
    pub fn from_parts(cid: BlockCid, data: Bytes) -> TypeResult<Self> {
        let computed = BlockCid::identify_with(cid.codec(), &data);
        if computed != cid {
            return Err(TypeError::CidMismatch {
                cid: cid.to_canonical(),
            });
        }
        Ok(Self { cid, data })
    }

    /// The block's content identifier.
    pub fn cid(&self) -> &BlockCid {
        &self.cid
    }

    /// The block's bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Consume the block, returning its bytes.
    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Size of the block in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl std::fmt::Debug for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Block")
            .field("cid", &self.cid)
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_cid_from_data() {
        let block = Block::new(Bytes::from_static(b"hello"));
        assert_eq!(*block.cid(), BlockCid::identify(b"hello"));
        assert_eq!(block.size(), 5);
    }

    #[test]
    fn from_parts_accepts_matching_data() {
        let cid = BlockCid::identify(b"verified");
        let block = Block::from_parts(cid, Bytes::from_static(b"verified")).unwrap();
        assert_eq!(*block.cid(), cid);
    }

    #[test]
    fn from_parts_rejects_mismatched_data() {
        let cid = BlockCid::identify(b"original");
        let err = Block::from_parts(cid, Bytes::from_static(b"tampered")).unwrap_err();
        assert!(matches!(err, TypeError::CidMismatch { .. }));
    }

    #[test]
    fn from_parts_checks_under_the_cid_codec() {
        let data = Bytes::from_static(b"{\"children\":[],\"size\":0}");
        let cid = BlockCid::identify_with(BlockCodec::Manifest, &data);
        let block = Block::from_parts(cid, data).unwrap();
        assert_eq!(block.cid().codec(), BlockCodec::Manifest);
    }

    #[test]
    fn empty_block_is_valid() {
        let block = Block::new(Bytes::new());
        assert_eq!(block.size(), 0);
        assert_eq!(*block.cid(), BlockCid::identify(b""));
    }

    #[test]
    fn into_data_returns_the_bytes() {
        let block = Block::new(Bytes::from_static(b"take me"));
        assert_eq!(block.into_data(), Bytes::from_static(b"take me"));
    }
}
