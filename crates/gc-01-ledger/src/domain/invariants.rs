//! Invariant checkers for chain custody
//!
//! These functions enforce the invariants that MUST hold for every chain
//! the ledger serves. They are shared by the live [`Ledger`](super::Ledger)
//! and by the standalone [`IntegrityVerifier`](super::IntegrityVerifier).

use super::block::Block;
use super::genesis::is_genesis_shaped;
use crate::utils::hashing::meets_difficulty;
use thiserror::Error;

/// First invariant violation found in a chain
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChainViolation {
    /// A ledger chain must contain at least the genesis block
    #[error("Chain is empty")]
    EmptyChain,

    /// The first block of a full chain is not a genesis block
    #[error(
        "Block {index} is not a valid genesis block \
         (previous hash {previous_hash:?}, nonce {nonce}, entry count {entry_count})"
    )]
    InvalidGenesis {
        /// Index found at the genesis position
        index: u64,
        /// Previous hash found at the genesis position
        previous_hash: String,
        /// Nonce found at the genesis position
        nonce: u64,
        /// Entry count found at the genesis position
        entry_count: u64,
    },

    /// Stored hash does not match the block fields
    #[error("Block {index} hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch {
        /// Offending block
        index: u64,
        /// Hash stored on the block
        stored: String,
        /// Hash recomputed from the fields
        computed: String,
    },

    /// Previous-hash does not point at the preceding block
    #[error("Block {index} links to {found}, expected {expected}")]
    BrokenLink {
        /// Offending block
        index: u64,
        /// Hash of the preceding block
        expected: String,
        /// Previous hash stored on the block
        found: String,
    },

    /// Hash lacks the required leading zeros
    #[error("Block {index} hash {hash} does not meet difficulty {difficulty}")]
    InsufficientWork {
        /// Offending block
        index: u64,
        /// Stored hash
        hash: String,
        /// Required leading zero digits
        difficulty: u32,
    },

    /// Indices are not consecutive
    #[error("Index gap: expected block {expected}, found {found}")]
    IndexGap {
        /// Index that should follow the previous block
        expected: u64,
        /// Index actually found
        found: u64,
    },
}

impl ChainViolation {
    /// Index of the block the violation was detected at, if any
    pub fn block_index(&self) -> Option<u64> {
        match self {
            Self::EmptyChain => None,
            Self::InvalidGenesis { index, .. }
            | Self::HashMismatch { index, .. }
            | Self::BrokenLink { index, .. }
            | Self::InsufficientWork { index, .. } => Some(*index),
            Self::IndexGap { found, .. } => Some(*found),
        }
    }
}

/// INVARIANT-1: Self-Hash
/// The stored hash MUST equal the hash recomputed from the block fields.
pub fn check_self_hash(block: &Block) -> Result<(), ChainViolation> {
    let computed = block.recompute_hash();
    if computed != block.hash() {
        return Err(ChainViolation::HashMismatch {
            index: block.index(),
            stored: block.hash().to_string(),
            computed,
        });
    }
    Ok(())
}

/// INVARIANT-2: Linkage
/// A block's previous hash MUST equal the stored hash of its predecessor,
/// and its index MUST follow the predecessor's.
pub fn check_linkage(previous: &Block, current: &Block) -> Result<(), ChainViolation> {
    let expected_index = previous.index().saturating_add(1);
    if current.index() != expected_index {
        return Err(ChainViolation::IndexGap {
            expected: expected_index,
            found: current.index(),
        });
    }
    if current.previous_hash() != previous.hash() {
        return Err(ChainViolation::BrokenLink {
            index: current.index(),
            expected: previous.hash().to_string(),
            found: current.previous_hash().to_string(),
        });
    }
    Ok(())
}

/// INVARIANT-3: Difficulty
/// Every non-genesis hash MUST carry `difficulty` leading zero digits.
/// Genesis is exempt: it is a fixed constant, never mined.
pub fn check_work(block: &Block, difficulty: u32) -> Result<(), ChainViolation> {
    if block.is_genesis() || meets_difficulty(block.hash(), difficulty) {
        return Ok(());
    }
    Err(ChainViolation::InsufficientWork {
        index: block.index(),
        hash: block.hash().to_string(),
        difficulty,
    })
}

/// INVARIANT-4: Genesis Shape
/// A block at index 0 MUST carry the sentinel previous hash, nonce 0 and
/// no entries.
pub fn check_genesis(block: &Block) -> Result<(), ChainViolation> {
    if block.is_genesis() && !is_genesis_shaped(block) {
        return Err(invalid_genesis(block));
    }
    Ok(())
}

fn invalid_genesis(block: &Block) -> ChainViolation {
    ChainViolation::InvalidGenesis {
        index: block.index(),
        previous_hash: block.previous_hash().to_string(),
        nonce: block.nonce(),
        entry_count: block.entry_count(),
    }
}

/// Validate an index-ordered run of blocks
///
/// The run may start anywhere in the chain; linkage is checked between
/// every adjacent pair and the per-block checks apply to every block.
/// An empty run is valid.
pub fn check_sequence(blocks: &[Block], difficulty: u32) -> Result<(), ChainViolation> {
    for (position, block) in blocks.iter().enumerate() {
        check_genesis(block)?;
        check_self_hash(block)?;
        check_work(block, difficulty)?;
        if position > 0 {
            check_linkage(&blocks[position - 1], block)?;
        }
    }
    Ok(())
}

/// Validate a complete chain: non-empty, rooted at genesis, then
/// [`check_sequence`].
pub fn check_full_chain(blocks: &[Block], difficulty: u32) -> Result<(), ChainViolation> {
    let first = blocks.first().ok_or(ChainViolation::EmptyChain)?;
    if !is_genesis_shaped(first) {
        return Err(invalid_genesis(first));
    }
    check_sequence(blocks, difficulty)
}
