//! Block entity
//!
//! A block is immutable once mined: all fields are read-only outside the
//! crate and the stored hash is computed at construction.

use crate::utils::hashing::block_hash;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// One unit of the chain
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain (genesis = 0)
    pub(crate) index: u64,

    /// Hash of the block at `index - 1`, or `"0"` for genesis
    pub(crate) previous_hash: String,

    /// Creation instant, millisecond precision
    pub(crate) timestamp: DateTime<Utc>,

    /// Opaque content (JSON array of entries for flushed blocks)
    pub(crate) payload: String,

    /// Proof-of-work nonce
    pub(crate) nonce: u64,

    /// Number of logical entries bundled in `payload`
    pub(crate) entry_count: u64,

    /// SHA-256 over the fields above
    pub(crate) hash: String,
}

impl Block {
    /// Construct a block and compute its hash from the given fields
    pub fn new(
        index: u64,
        previous_hash: impl Into<String>,
        timestamp: DateTime<Utc>,
        payload: impl Into<String>,
        nonce: u64,
        entry_count: u64,
    ) -> Self {
        let mut block = Self {
            index,
            previous_hash: previous_hash.into(),
            timestamp: truncate_to_millis(timestamp),
            payload: payload.into(),
            nonce,
            entry_count,
            hash: String::new(),
        };
        block.hash = block.recompute_hash();
        block
    }

    /// Rebuild a block around a previously stored hash, without recomputing it
    pub(crate) fn from_stored(
        index: u64,
        previous_hash: String,
        timestamp: DateTime<Utc>,
        payload: String,
        nonce: u64,
        entry_count: u64,
        hash: String,
    ) -> Self {
        Self {
            index,
            previous_hash,
            timestamp,
            payload,
            nonce,
            entry_count,
            hash,
        }
    }

    /// Recompute the hash from the current field values
    pub fn recompute_hash(&self) -> String {
        block_hash(
            self.index,
            &self.previous_hash,
            self.timestamp.timestamp_millis(),
            &self.payload,
            self.nonce,
        )
    }

    /// Whether the stored hash matches the fields
    pub fn is_self_consistent(&self) -> bool {
        self.hash == self.recompute_hash()
    }

    /// Whether this block sits at the genesis position
    pub fn is_genesis(&self) -> bool {
        self.index == 0
    }

    /// Position in the chain
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Hash of the preceding block
    pub fn previous_hash(&self) -> &str {
        &self.previous_hash
    }

    /// Creation instant
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Opaque content
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Proof-of-work nonce
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Number of entries bundled in the payload
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Stored hash
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Drop sub-millisecond precision so the hash preimage and the ISO-8601
/// transfer form describe the same instant.
pub fn truncate_to_millis(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp.timestamp_millis())
        .single()
        .unwrap_or(timestamp)
}
