//! Inbound ports (driving side - API)

use crate::domain::{Block, BlockRecord, ChainSummary, MarkerSearch};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Primary port: ledger operations offered to the application layer
#[async_trait]
pub trait LedgerApi: Send + Sync {
    /// Buffer an entry for the next flush
    async fn submit_entry(&self, entry: Value) -> Result<()>;

    /// Seal all pending entries into a new block; `None` if nothing pending
    async fn flush_pending(&self) -> Result<Option<Block>>;

    /// Entries waiting for the next flush
    async fn pending_count(&self) -> usize;

    /// Up to `count` blocks, newest first
    async fn recent_blocks(&self, count: usize) -> Vec<Block>;

    /// Block at `index`
    async fn block_by_index(&self, index: u64) -> Option<Block>;

    /// Block carrying `hash`
    async fn block_by_hash(&self, hash: &str) -> Option<Block>;

    /// Every block, newest first
    async fn blocks_newest_first(&self) -> Vec<Block>;

    /// Whether the live chain satisfies every invariant
    async fn is_chain_valid(&self) -> bool;

    /// Verify an externally supplied chain at the ledger's difficulty
    async fn verify_records(&self, records: &[BlockRecord]) -> bool;

    /// Export the chain as transfer records
    async fn export_records(&self) -> Vec<BlockRecord>;

    /// Search committed payloads for a marker
    async fn find_marker(&self, marker: &str) -> MarkerSearch;

    /// Point-in-time overview
    async fn summary(&self) -> ChainSummary;
}
