//! Outbound events (published)

use serde::{Deserialize, Serialize};

/// Event version carried by every ledger event
pub const EVENT_VERSION: u16 = 1;

/// Event emitted by [`LedgerService`](crate::LedgerService)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A block was mined and appended
    BlockAppended {
        /// Event version
        version: u16,
        /// Sender subsystem ID (always 1)
        sender_id: u8,
        /// Index of the new block
        index: u64,
        /// Hash of the new block
        hash: String,
        /// Entries sealed in the block
        entry_count: u64,
        /// Winning nonce
        nonce: u64,
        /// Nonces tried
        attempts: u64,
        /// Mining time in milliseconds
        mining_time_ms: u64,
    },

    /// A flush did not produce a block; its entries are pending again
    MiningFailed {
        /// Event version
        version: u16,
        /// Sender subsystem ID (always 1)
        sender_id: u8,
        /// Entries returned to the pending buffer
        entry_count: u64,
        /// Error description
        reason: String,
    },
}

impl LedgerEvent {
    /// Build a [`LedgerEvent::BlockAppended`]
    pub fn block_appended(
        index: u64,
        hash: impl Into<String>,
        entry_count: u64,
        nonce: u64,
        attempts: u64,
        mining_time_ms: u64,
    ) -> Self {
        Self::BlockAppended {
            version: EVENT_VERSION,
            sender_id: crate::SUBSYSTEM_ID,
            index,
            hash: hash.into(),
            entry_count,
            nonce,
            attempts,
            mining_time_ms,
        }
    }

    /// Build a [`LedgerEvent::MiningFailed`]
    pub fn mining_failed(entry_count: u64, reason: impl Into<String>) -> Self {
        Self::MiningFailed {
            version: EVENT_VERSION,
            sender_id: crate::SUBSYSTEM_ID,
            entry_count,
            reason: reason.into(),
        }
    }
}
