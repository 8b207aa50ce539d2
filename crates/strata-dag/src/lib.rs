//! Chunked object graphs for Strata.
//!
//! An object submitted by a caller is stored as one or more blocks rooted
//! at a single CID:
//!
//! - small objects (at most one chunk) are a single raw block, and the root
//!   CID is the block's CID — no indirection;
//! - larger objects are split into fixed-size raw leaf blocks plus a JSON
//!   [`ManifestNode`] root listing the children in order.
//!
//! [`ObjectWriter`] is a streaming fold: bytes are pushed in, full chunks
//! are flushed to the block store as they fill, and `finish()` seals the
//! object and returns its root CID. Memory use is bounded by the chunk
//! size, independent of object size. [`ObjectReader`] walks the graph back
//! in order, one block in flight at a time, verifying each block against
//! its CID.

pub mod error;
pub mod manifest;
pub mod reader;
pub mod writer;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{DagError, DagResult};
pub use manifest::{ChildRef, ManifestNode};
pub use reader::ObjectReader;
pub use writer::{ObjectWriter, DEFAULT_CHUNK_SIZE};
