//! Genesis Block Creation
//!
//! The genesis block bootstraps the chain. It is never mined: nonce 0,
//! sentinel previous hash `"0"`, and a fixed payload literal. Validation
//! still checks that its stored hash matches its fields, but the
//! difficulty predicate does not apply to it.

use super::block::Block;
use chrono::{DateTime, Utc};

/// Creates the genesis block with the default payload literal
pub fn create_genesis_block(timestamp: DateTime<Utc>) -> Block {
    create_genesis_block_with_payload(timestamp, crate::GENESIS_PAYLOAD)
}

/// Creates the genesis block with a custom payload literal
pub fn create_genesis_block_with_payload(timestamp: DateTime<Utc>, payload: &str) -> Block {
    Block::new(0, crate::GENESIS_PREVIOUS_HASH, timestamp, payload, 0, 0)
}

/// Whether a block has the shape of a genesis block
///
/// The payload literal is configurable, so only the structural fields are
/// checked here: index 0, sentinel previous hash, nonce 0, no entries.
pub fn is_genesis_shaped(block: &Block) -> bool {
    block.index() == 0
        && block.previous_hash() == crate::GENESIS_PREVIOUS_HASH
        && block.nonce() == 0
        && block.entry_count() == 0
}

// =============================================================================
// Tests
// =============================================================================
