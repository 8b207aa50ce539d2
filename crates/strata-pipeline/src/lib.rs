//! Ingestion and egress pipeline for Strata.
//!
//! [`Pipeline`] orchestrates the content addresser, the chunked object
//! writer/reader, and a block store into the two public operations:
//!
//! - **add**: consume a byte stream, store it as content-addressed blocks,
//!   return the root CID and total size;
//! - **cat**: given an identifier (optionally carrying a `/blocks/` routing
//!   prefix), stream the content back out.
//!
//! Errors keep their shape end to end: a malformed identifier
//! ([`EgressError::InvalidCid`]), absent content ([`EgressError::NotFound`]),
//! and a failing durable backend ([`EgressError::Store`]) are never
//! collapsed, because the boundary layer answers each differently. During
//! egress, errors travel on the stream's error channel — a consumer never
//! sees corrupt bytes, only a clean error item after which the stream ends.

pub mod error;
pub mod pipeline;
pub mod stream;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{BoxError, EgressError, IngestError};
pub use pipeline::{AddOutcome, Pipeline};
pub use stream::CatStream;

// The writer's chunk size is part of this crate's construction surface.
pub use strata_dag::DEFAULT_CHUNK_SIZE;
