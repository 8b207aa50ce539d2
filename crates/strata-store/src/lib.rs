//! Tiered block storage for Strata.
//!
//! Blocks are stored behind a single [`BlockStore`] contract composed from
//! two tiers:
//!
//! - a **cache tier** ([`MemoryBlockStore`]) — process-lifetime, no
//!   persistence guarantee, bounded only by available memory;
//! - a **durable tier** ([`BackendBlockStore`]) — authoritative source of
//!   truth, backed by an abstract key-value blob service ([`BlobBackend`]).
//!
//! [`TieredBlockStore`] composes the two: cache-first reads with write-back
//! on a durable hit, write-through writes, and existence checks that consult
//! both tiers without populating the cache.
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once written (content-addressing guarantees this).
//! 2. A miss ([`StoreError::NotFound`]) is always distinguishable from a
//!    backend failure ([`StoreError::Backend`]).
//! 3. No lock is held across an await point; durable I/O never serializes
//!    cache access for unrelated CIDs.
//! 4. Last-write-wins per CID is acceptable: equal CIDs imply equal bytes.
//! 5. All backend errors are propagated, never silently ignored.

pub mod backend;
pub mod durable;
pub mod error;
pub mod memory;
pub mod tiered;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use backend::{FsBlobBackend, MemoryBlobBackend};
pub use durable::BackendBlockStore;
pub use error::{BackendError, BackendResult, StoreError, StoreResult};
pub use memory::MemoryBlockStore;
pub use tiered::TieredBlockStore;
pub use traits::{BlobBackend, BlockStore};
