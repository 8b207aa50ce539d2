use strata_types::BlockCid;
use thiserror::Error;

/// Errors from block store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested block exists in neither tier. Terminal, not retried.
    #[error("block not found: {0}")]
    NotFound(BlockCid),

    /// The durable tier could not be reached or failed the operation.
    /// Transient or permanent; the store does not retry internally.
    #[error("durable tier failure: {0}")]
    Backend(#[from] BackendError),
}

/// Result alias for block store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the durable blob backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The storage key is malformed (empty, absolute, or escaping the root).
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// I/O failure in the backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused or could not serve the request.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for blob backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
