use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The identifier text or bytes could not be decoded as a CID this
    /// system understands. Always a client-input error, never retried.
    #[error("invalid CID: {0}")]
    InvalidCid(String),

    /// Block bytes do not hash back to the CID they were paired with.
    #[error("content does not match CID {cid}")]
    CidMismatch { cid: String },
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
