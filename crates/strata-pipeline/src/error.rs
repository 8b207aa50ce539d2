use strata_dag::DagError;
use strata_store::StoreError;
use strata_types::{BlockCid, TypeError};
use thiserror::Error;

/// Boxed error type for caller-supplied input streams.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors from the add operation.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The caller's input stream failed mid-upload.
    #[error("failed to read content stream: {0}")]
    Read(#[source] BoxError),

    /// Storing blocks failed; the underlying store error is preserved.
    #[error("failed to store content: {0}")]
    Store(#[from] DagError),
}

/// Errors from the cat operation, surfaced either from the call itself or
/// through the returned stream's error channel.
#[derive(Debug, Error)]
pub enum EgressError {
    /// The identifier did not parse as a CID. Client input error.
    #[error("invalid content identifier {text:?}: {source}")]
    InvalidCid {
        text: String,
        #[source]
        source: TypeError,
    },

    /// The identifier is well-formed but no such content exists.
    #[error("content not found: {0}")]
    NotFound(BlockCid),

    /// The block store failed while resolving or streaming content.
    #[error("store failure while streaming: {0}")]
    Store(#[source] StoreError),

    /// Stored data is unreadable: corrupt manifest or integrity mismatch.
    #[error("corrupt object graph: {0}")]
    Corrupt(#[source] DagError),
}

impl From<DagError> for EgressError {
    fn from(e: DagError) -> Self {
        match e {
            DagError::Store(StoreError::NotFound(cid)) => Self::NotFound(cid),
            DagError::Store(e) => Self::Store(e),
            other => Self::Corrupt(other),
        }
    }
}
