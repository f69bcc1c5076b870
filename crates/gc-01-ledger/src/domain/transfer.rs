//! Transfer form of a block
//!
//! `BlockRecord` is the plain-data shape handed to any persistence layer:
//! `{ index, previousHash, timestamp, payload, nonce, entryCount, hash }`
//! with the timestamp rendered as ISO-8601. Converting a record back into a
//! [`Block`] keeps the stored hash verbatim, so tampered records surface as
//! validation failures rather than being silently repaired.

use super::block::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persistable block record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockRecord {
    /// Position in the chain
    pub index: u64,
    /// Hash of the preceding block
    pub previous_hash: String,
    /// Creation instant (ISO-8601 on the wire)
    pub timestamp: DateTime<Utc>,
    /// Opaque content
    pub payload: String,
    /// Proof-of-work nonce
    pub nonce: u64,
    /// Number of entries bundled in the payload
    pub entry_count: u64,
    /// Hash as stored when the block was mined
    pub hash: String,
}

impl From<&Block> for BlockRecord {
    fn from(block: &Block) -> Self {
        Self {
            index: block.index(),
            previous_hash: block.previous_hash().to_string(),
            timestamp: block.timestamp(),
            payload: block.payload().to_string(),
            nonce: block.nonce(),
            entry_count: block.entry_count(),
            hash: block.hash().to_string(),
        }
    }
}

impl From<BlockRecord> for Block {
    fn from(record: BlockRecord) -> Self {
        Block::from_stored(
            record.index,
            record.previous_hash,
            record.timestamp,
            record.payload,
            record.nonce,
            record.entry_count,
            record.hash,
        )
    }
}

/// Convert records into blocks ordered by index
pub fn blocks_from_records(records: impl IntoIterator<Item = BlockRecord>) -> Vec<Block> {
    let mut blocks: Vec<Block> = records.into_iter().map(Block::from).collect();
    blocks.sort_by_key(|block| block.index());
    blocks
}
