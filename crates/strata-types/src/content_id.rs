use std::fmt;
use std::str::FromStr;

use cid::multihash::Multihash;
use cid::{Cid, Version};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TypeError, TypeResult};

/// Multicodec code for the BLAKE3 hash function.
const BLAKE3_CODE: u64 = 0x1e;
/// BLAKE3 digest length in bytes.
const DIGEST_LEN: usize = 32;

/// Payload codec carried by a [`BlockCid`].
///
/// Leaf blocks hold raw bytes; manifest blocks hold the JSON root node of a
/// multi-block object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockCodec {
    /// Raw binary content (multicodec `raw`).
    Raw,
    /// JSON manifest node referencing child blocks (multicodec `json`).
    Manifest,
}

impl BlockCodec {
    /// The multicodec code for this codec.
    pub const fn code(self) -> u64 {
        match self {
            Self::Raw => 0x55,
            Self::Manifest => 0x0200,
        }
    }

    /// Map a multicodec code back to a known codec.
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            0x55 => Some(Self::Raw),
            0x0200 => Some(Self::Manifest),
            _ => None,
        }
    }
}

impl fmt::Display for BlockCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Manifest => write!(f, "json"),
        }
    }
}

/// Content identifier for a stored block.
///
/// A `BlockCid` is a CIDv1 over the BLAKE3 hash of the block's bytes.
/// Identical content always produces the same `BlockCid`. The canonical
/// text form is the CIDv1 default: multibase base32, lowercase, unpadded —
/// filesystem- and URL-safe.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockCid(Cid);

impl BlockCid {
    /// Derive the CID for raw content bytes.
    pub fn identify(data: &[u8]) -> Self {
        Self::identify_with(BlockCodec::Raw, data)
    }

    /// Derive the CID for content under a specific payload codec.
    pub fn identify_with(codec: BlockCodec, data: &[u8]) -> Self {
        let digest = blake3::hash(data);
        let multihash = Multihash::wrap(BLAKE3_CODE, digest.as_bytes())
            .expect("a 32-byte digest always fits in a multihash");
        Self(Cid::new_v1(codec.code(), multihash))
    }

    /// Parse a CID from its text form (any multibase; base32 is canonical).
    pub fn parse(text: &str) -> TypeResult<Self> {
        let cid = Cid::try_from(text)
            .map_err(|e| TypeError::InvalidCid(format!("{text:?}: {e}")))?;
        Self::validate(cid)
    }

    /// Decode a CID from its compact binary form.
    pub fn from_bytes(bytes: &[u8]) -> TypeResult<Self> {
        let cid = Cid::try_from(bytes)
            .map_err(|e| TypeError::InvalidCid(format!("{} bytes: {e}", bytes.len())))?;
        Self::validate(cid)
    }

    /// Reject CIDs this system cannot serve: wrong version, unknown payload
    /// codec, or a hash function other than BLAKE3.
    fn validate(cid: Cid) -> TypeResult<Self> {
        if cid.version() != Version::V1 {
            return Err(TypeError::InvalidCid(format!(
                "unsupported CID version {:?}",
                cid.version()
            )));
        }
        if BlockCodec::from_code(cid.codec()).is_none() {
            return Err(TypeError::InvalidCid(format!(
                "unsupported payload codec 0x{:x}",
                cid.codec()
            )));
        }
        let hash = cid.hash();
        if hash.code() != BLAKE3_CODE {
            return Err(TypeError::InvalidCid(format!(
                "unsupported hash algorithm 0x{:x}",
                hash.code()
            )));
        }
        if hash.digest().len() != DIGEST_LEN {
            return Err(TypeError::InvalidCid(format!(
                "invalid digest length {}",
                hash.digest().len()
            )));
        }
        Ok(Self(cid))
    }

    /// The payload codec of this CID.
    pub fn codec(&self) -> BlockCodec {
        BlockCodec::from_code(self.0.codec()).expect("validated at construction")
    }

    /// Canonical text form: lowercase base32, unpadded.
    pub fn to_canonical(&self) -> String {
        self.0.to_string()
    }

    /// Compact binary form, suitable as a store key.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    /// Short prefix of the canonical text, for log lines.
    pub fn short_text(&self) -> String {
        let text = self.to_canonical();
        text.chars().take(12).collect()
    }
}

impl fmt::Debug for BlockCid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockCid({})", self.short_text())
    }
}

impl fmt::Display for BlockCid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical())
    }
}

impl FromStr for BlockCid {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for BlockCid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.serialize_str(&self.to_canonical())
        } else {
            serializer.serialize_bytes(&self.to_bytes())
        }
    }
}

impl<'de> Deserialize<'de> for BlockCid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CidVisitor;

        impl Visitor<'_> for CidVisitor {
            type Value = BlockCid;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a CID in text or binary form")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                BlockCid::parse(v).map_err(de::Error::custom)
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                BlockCid::from_bytes(v).map_err(de::Error::custom)
            }
        }

        if deserializer.is_human_readable() {
            deserializer.deserialize_str(CidVisitor)
        } else {
            deserializer.deserialize_bytes(CidVisitor)
        }
    }
}
