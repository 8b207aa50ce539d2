use strata_store::StoreError;
use strata_types::BlockCid;
use thiserror::Error;

/// Errors from object graph operations.
#[derive(Debug, Error)]
pub enum DagError {
    /// The block store failed or the block is missing.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The manifest node could not be encoded.
    #[error("failed to encode manifest: {0}")]
    Serialization(String),

    /// A block claiming to be a manifest does not decode as one.
    #[error("corrupt manifest {cid}: {reason}")]
    CorruptManifest { cid: BlockCid, reason: String },

    /// Stored bytes do not hash back to the CID they were fetched under.
    #[error("block {cid} failed integrity verification")]
    IntegrityMismatch { cid: BlockCid },
}

/// Result alias for object graph operations.
pub type DagResult<T> = Result<T, DagError>;
