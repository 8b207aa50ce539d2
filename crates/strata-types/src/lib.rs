//! Core types for Strata content-addressed storage.
//!
//! Everything stored by Strata is an immutable [`Block`] identified by a
//! [`BlockCid`] derived from its bytes: identical bytes always produce the
//! same CID, so blocks are deduplicatable and verifiable. CIDs are CIDv1 on
//! a BLAKE3 multihash, with a canonical lowercase base32 text form used for
//! storage keys and user-facing paths.
//!
//! # Design Rules
//!
//! 1. A block's identity IS its content; blocks are never mutated in place.
//! 2. `BlockCid::parse(cid.to_canonical())` round-trips for every valid CID.
//! 3. Malformed identifier input is rejected with [`TypeError::InvalidCid`],
//!    never an unstructured panic or a silently truncated value.

pub mod block;
pub mod content_id;
pub mod error;

// Re-export primary types at crate root for ergonomic imports.
pub use block::Block;
pub use content_id::{BlockCid, BlockCodec};
pub use error::{TypeError, TypeResult};
