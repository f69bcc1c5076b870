//! The ledger state machine over `{chain, pending, difficulty}`

use super::block::Block;
use super::genesis::create_genesis_block_with_payload;
use super::invariants::{check_full_chain, ChainViolation};
use super::pow::{MiningOutcome, ProofOfWork};
use super::transfer::{blocks_from_records, BlockRecord};
use super::verifier::{search_payload_for_marker, MarkerSearch};
use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

/// Block fields fixed before the nonce search starts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCandidate {
    /// Index the block will occupy
    pub index: u64,
    /// Hash of the tip the candidate extends
    pub previous_hash: String,
    /// Creation instant
    pub timestamp: DateTime<Utc>,
    /// Serialized entries
    pub payload: String,
    /// Number of entries in the payload
    pub entry_count: u64,
}

impl BlockCandidate {
    /// Run the nonce search for this candidate
    pub fn mine(&self, pow: &ProofOfWork, cancel: &AtomicBool) -> Result<MiningOutcome> {
        pow.mine_cancellable(
            self.index,
            &self.previous_hash,
            self.timestamp,
            &self.payload,
            cancel,
        )
    }
}

/// Point-in-time overview of a ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSummary {
    /// Number of blocks including genesis
    pub length: usize,
    /// Index of the latest block
    pub height: u64,
    /// Hash of the latest block
    pub tip_hash: String,
    /// Required leading zero digits
    pub difficulty: u32,
    /// Entries waiting for the next flush
    pub pending_entries: usize,
    /// Sum of entry counts across the chain
    pub committed_entries: u64,
    /// Result of full chain validation
    pub valid: bool,
}

/// Append-only ledger
#[derive(Clone, Debug)]
pub struct Ledger {
    /// Blocks in index order; never empty
    chain: Vec<Block>,

    /// Hash -> position in `chain`
    by_hash: HashMap<String, usize>,

    /// Entries not yet committed
    pending: Vec<Value>,

    /// Nonce search settings
    pow: ProofOfWork,
}

impl Ledger {
    /// Create a ledger with the given difficulty and default settings
    pub fn new(difficulty: u32) -> Self {
        Self::build(&LedgerConfig::with_difficulty(difficulty))
    }

    /// Create a ledger from validated configuration
    pub fn with_config(config: &LedgerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: &LedgerConfig) -> Self {
        let genesis = create_genesis_block_with_payload(Utc::now(), &config.genesis_payload);
        tracing::info!(
            difficulty = config.difficulty,
            genesis_hash = %genesis.hash(),
            "Ledger created"
        );
        Self::from_blocks(vec![genesis], Self::pow_for(config))
    }

    fn pow_for(config: &LedgerConfig) -> ProofOfWork {
        ProofOfWork::new(config.difficulty).with_max_iterations(config.max_nonce_iterations)
    }

    fn from_blocks(chain: Vec<Block>, pow: ProofOfWork) -> Self {
        let mut by_hash = HashMap::with_capacity(chain.len());
        for (position, block) in chain.iter().enumerate() {
            by_hash.entry(block.hash().to_string()).or_insert(position);
        }
        Self {
            chain,
            by_hash,
            pending: Vec::new(),
            pow,
        }
    }

    /// Rebuild a ledger from transfer records
    ///
    /// Records are sorted by index and each stored hash is kept verbatim.
    /// Empty input yields a fresh ledger with a new genesis block.
    pub fn from_transferable(records: Vec<BlockRecord>, difficulty: u32) -> Self {
        Self::from_transferable_with_config(records, &LedgerConfig::with_difficulty(difficulty))
    }

    /// Rebuild a ledger from transfer records using full configuration
    pub fn from_transferable_with_config(records: Vec<BlockRecord>, config: &LedgerConfig) -> Self {
        if records.is_empty() {
            return Self::build(config);
        }
        let blocks = blocks_from_records(records);
        tracing::info!(blocks = blocks.len(), "Ledger restored from records");
        Self::from_blocks(blocks, Self::pow_for(config))
    }

    /// Export every block as a plain record, in chain order
    pub fn to_transferable(&self) -> Vec<BlockRecord> {
        self.chain.iter().map(BlockRecord::from).collect()
    }

    /// Required leading zero digits
    pub fn difficulty(&self) -> u32 {
        self.pow.difficulty()
    }

    /// Nonce search settings
    pub fn proof_of_work(&self) -> &ProofOfWork {
        &self.pow
    }

    /// Number of blocks including genesis
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: the chain holds at least the genesis block
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Blocks in index order
    pub fn blocks(&self) -> &[Block] {
        &self.chain
    }

    /// The first block
    pub fn genesis(&self) -> &Block {
        &self.chain[0]
    }

    /// The most recent block
    pub fn latest_block(&self) -> &Block {
        // The chain is created with genesis and only ever appended to.
        &self.chain[self.chain.len() - 1]
    }

    /// Entries waiting for the next flush
    pub fn pending(&self) -> &[Value] {
        &self.pending
    }

    /// Buffer an entry for the next flush
    ///
    /// The ledger does not interpret entries; anything serde can render as
    /// JSON is accepted.
    pub fn add_entry<T: Serialize>(&mut self, entry: T) -> Result<()> {
        let value = serde_json::to_value(entry)?;
        self.pending.push(value);
        tracing::debug!(pending = self.pending.len(), "Entry buffered");
        Ok(())
    }

    /// Mine and append a block carrying `payload`
    pub fn add_block(&mut self, payload: impl Into<String>, entry_count: u64) -> Result<Block> {
        let candidate = self.prepare_candidate(payload, entry_count);
        let never = AtomicBool::new(false);
        let outcome = candidate.mine(&self.pow, &never)?;
        self.append_mined(candidate, outcome)
    }

    /// Seal every pending entry into one new block
    ///
    /// Returns `Ok(None)` without touching the chain when nothing is
    /// pending. On mining failure the pending entries are kept.
    pub fn flush_pending(&mut self) -> Result<Option<Block>> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        let payload = serialize_entries(&self.pending)?;
        let block = self.add_block(payload, self.pending.len() as u64)?;
        self.pending.clear();
        Ok(Some(block))
    }

    /// Fix the fields of the next block against the current tip
    pub fn prepare_candidate(&self, payload: impl Into<String>, entry_count: u64) -> BlockCandidate {
        let latest = self.latest_block();
        BlockCandidate {
            index: latest.index() + 1,
            previous_hash: latest.hash().to_string(),
            timestamp: Utc::now(),
            payload: payload.into(),
            entry_count,
        }
    }

    /// Append a candidate whose nonce search has completed
    ///
    /// Fails with [`LedgerError::StaleCandidate`] if the tip moved since
    /// the candidate was prepared.
    pub fn append_mined(
        &mut self,
        candidate: BlockCandidate,
        outcome: MiningOutcome,
    ) -> Result<Block> {
        let latest = self.latest_block();
        if candidate.previous_hash != latest.hash() || candidate.index != latest.index() + 1 {
            return Err(LedgerError::StaleCandidate {
                expected_parent: candidate.previous_hash,
                actual_parent: latest.hash().to_string(),
            });
        }

        let block = Block::new(
            candidate.index,
            candidate.previous_hash,
            candidate.timestamp,
            candidate.payload,
            outcome.nonce,
            candidate.entry_count,
        );
        if block.hash() != outcome.hash {
            return Err(LedgerError::Internal(format!(
                "mined hash {} does not match block hash {}",
                outcome.hash,
                block.hash()
            )));
        }

        tracing::info!(
            subsystem = crate::SUBSYSTEM_ID,
            block_index = block.index(),
            block_hash = %block.hash(),
            nonce = block.nonce(),
            attempts = outcome.attempts,
            entries = block.entry_count(),
            "Block appended"
        );

        self.by_hash
            .entry(block.hash().to_string())
            .or_insert(self.chain.len());
        self.chain.push(block.clone());
        Ok(block)
    }

    /// Remove and return every pending entry
    pub fn take_pending(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.pending)
    }

    /// Put entries back at the front of the pending buffer
    pub fn restore_pending(&mut self, mut entries: Vec<Value>) {
        entries.append(&mut self.pending);
        self.pending = entries;
    }

    /// Whether every chain invariant holds
    pub fn is_chain_valid(&self) -> bool {
        match self.validate() {
            Ok(()) => true,
            Err(violation) => {
                tracing::warn!(%violation, "Chain validation failed");
                false
            }
        }
    }

    /// Check every chain invariant, reporting the first violation
    pub fn validate(&self) -> std::result::Result<(), ChainViolation> {
        check_full_chain(&self.chain, self.difficulty())
    }

    /// Look a block up by its stored hash
    pub fn block_by_hash(&self, hash: &str) -> Option<&Block> {
        self.by_hash.get(hash).map(|position| &self.chain[*position])
    }

    /// Look a block up by index
    pub fn block_by_index(&self, index: u64) -> Option<&Block> {
        let direct = usize::try_from(index)
            .ok()
            .and_then(|position| self.chain.get(position))
            .filter(|block| block.index() == index);
        direct.or_else(|| {
            self.chain
                .binary_search_by_key(&index, Block::index)
                .ok()
                .map(|position| &self.chain[position])
        })
    }

    /// Every block, newest first
    pub fn blocks_newest_first(&self) -> Vec<Block> {
        self.chain.iter().rev().cloned().collect()
    }

    /// Up to `count` blocks, newest first
    pub fn recent_blocks(&self, count: usize) -> Vec<Block> {
        self.chain.iter().rev().take(count).cloned().collect()
    }

    /// Search block payloads for a marker; the position is the block index
    pub fn find_marker(&self, marker: &str) -> MarkerSearch {
        search_payload_for_marker(self.chain.iter().map(Block::payload), marker)
    }

    /// Point-in-time overview
    pub fn summary(&self) -> ChainSummary {
        let latest = self.latest_block();
        ChainSummary {
            length: self.chain.len(),
            height: latest.index(),
            tip_hash: latest.hash().to_string(),
            difficulty: self.difficulty(),
            pending_entries: self.pending.len(),
            committed_entries: self.chain.iter().map(Block::entry_count).sum(),
            valid: self.validate().is_ok(),
        }
    }
}

/// Render entries as the JSON array stored in a block payload
pub fn serialize_entries(entries: &[Value]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_ledger_has_valid_genesis() {
        let ledger = Ledger::new(2);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.latest_block().index(), 0);
        assert_eq!(ledger.genesis().payload(), "Genesis Block");
        assert!(ledger.is_chain_valid());
    }

    #[test]
    fn test_health_scenario() {
        let mut ledger = Ledger::new(1);
        ledger
            .add_entry(json!({ "department": "Health", "amount": 100 }))
            .unwrap();
        let block = ledger.flush_pending().unwrap().unwrap();

        assert_eq!(ledger.len(), 2);
        assert_eq!(block.previous_hash(), ledger.genesis().hash());
        assert!(block.hash().starts_with('0'));
        assert_eq!(block.entry_count(), 1);

        ledger.add_entry(json!({ "department": "Education", "amount": 40 })).unwrap();
        ledger.add_entry(json!({ "department": "Transport", "amount": 75 })).unwrap();
        let second = ledger.flush_pending().unwrap().unwrap();

        assert_eq!(ledger.len(), 3);
        assert_eq!(second.index(), 2);
        assert_eq!(second.entry_count(), 2);
        assert!(ledger.pending().is_empty());
        assert!(ledger.is_chain_valid());
    }

    #[test]
    fn test_flush_payload_is_json_array() {
        let mut ledger = Ledger::new(0);
        ledger.add_entry(json!({ "hash": "abc" })).unwrap();
        let block = ledger.flush_pending().unwrap().unwrap();
        let parsed: Value = serde_json::from_str(block.payload()).unwrap();
        assert_eq!(parsed, json!([{ "hash": "abc" }]));
    }

    #[test]
    fn test_empty_flush_is_noop() {
        let mut ledger = Ledger::new(1);
        assert!(ledger.flush_pending().unwrap().is_none());
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_add_block_n_times_stays_valid() {
        let mut ledger = Ledger::new(1);
        for n in 0..5 {
            ledger.add_block(format!("payload-{n}"), 0).unwrap();
        }
        assert_eq!(ledger.len(), 6);
        assert!(ledger.is_chain_valid());
    }

    #[test]
    fn test_tampered_payload_invalidates_chain() {
        let mut ledger = Ledger::new(1);
        ledger.add_block("one", 1).unwrap();
        ledger.add_block("two", 1).unwrap();
        ledger.chain[1].payload = "forged".to_string();
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn test_tampered_previous_hash_invalidates_chain() {
        let mut ledger = Ledger::new(1);
        ledger.add_block("one", 1).unwrap();
        ledger.chain[1].previous_hash = "f".repeat(64);
        assert!(!ledger.is_chain_valid());
    }

    #[test]
    fn test_lookups() {
        let mut ledger = Ledger::new(1);
        let first = ledger.add_block("one", 1).unwrap();
        let second = ledger.add_block("two", 1).unwrap();

        assert_eq!(ledger.block_by_hash(first.hash()), Some(&first));
        assert_eq!(ledger.block_by_index(2), Some(&second));
        assert!(ledger.block_by_hash("missing").is_none());
        assert!(ledger.block_by_index(99).is_none());
    }

    #[test]
    fn test_newest_first_views() {
        let mut ledger = Ledger::new(0);
        for n in 0..4 {
            ledger.add_block(format!("{n}"), 0).unwrap();
        }
        let all = ledger.blocks_newest_first();
        assert_eq!(all.len(), 5);
        assert_eq!(all[0].index(), 4);
        assert_eq!(all[4].index(), 0);
        assert_eq!(ledger.blocks()[0].index(), 0);

        let recent = ledger.recent_blocks(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].index(), 4);
        assert_eq!(ledger.recent_blocks(50).len(), 5);
    }

    #[test]
    fn test_transfer_round_trip() {
        let mut ledger = Ledger::new(1);
        ledger.add_block("one", 1).unwrap();
        ledger.add_block("two", 2).unwrap();

        let restored = Ledger::from_transferable(ledger.to_transferable(), 1);
        assert_eq!(restored.len(), ledger.len());
        assert_eq!(restored.blocks(), ledger.blocks());
        assert_eq!(restored.is_chain_valid(), ledger.is_chain_valid());
    }

    #[test]
    fn test_from_transferable_sorts_and_keeps_hash() {
        let mut ledger = Ledger::new(1);
        ledger.add_block("one", 1).unwrap();
        let mut records = ledger.to_transferable();
        records.reverse();
        records[0].hash = "e".repeat(64);

        let restored = Ledger::from_transferable(records, 1);
        assert_eq!(restored.latest_block().hash(), "e".repeat(64));
        assert!(!restored.is_chain_valid());
    }

    #[test]
    fn test_from_empty_transferable_creates_genesis() {
        let restored = Ledger::from_transferable(Vec::new(), 1);
        assert_eq!(restored.len(), 1);
        assert!(restored.is_chain_valid());
    }

    #[test]
    fn test_stale_candidate_rejected() {
        let mut ledger = Ledger::new(0);
        let candidate = ledger.prepare_candidate("late", 1);
        let outcome = candidate
            .mine(ledger.proof_of_work(), &AtomicBool::new(false))
            .unwrap();
        ledger.add_block("first", 1).unwrap();

        let result = ledger.append_mined(candidate, outcome);
        assert!(matches!(result, Err(LedgerError::StaleCandidate { .. })));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_mining_failure_keeps_pending() {
        let config = LedgerConfig {
            difficulty: 64,
            max_nonce_iterations: Some(10),
            ..LedgerConfig::default()
        };
        let mut ledger = Ledger::with_config(&config).unwrap();
        ledger.add_entry(json!({ "hash": "x" })).unwrap();

        let result = ledger.flush_pending();
        assert!(matches!(result, Err(LedgerError::MiningExhausted { .. })));
        assert_eq!(ledger.pending().len(), 1);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_take_and_restore_pending_preserves_order() {
        let mut ledger = Ledger::new(0);
        ledger.add_entry(json!(1)).unwrap();
        ledger.add_entry(json!(2)).unwrap();
        let taken = ledger.take_pending();
        ledger.add_entry(json!(3)).unwrap();
        ledger.restore_pending(taken);
        assert_eq!(ledger.pending(), &[json!(1), json!(2), json!(3)]);
    }

    #[test]
    fn test_find_marker_and_summary() {
        let mut ledger = Ledger::new(0);
        ledger.add_block("unrelated", 0).unwrap();
        ledger.add_entry(json!({ "hash": "abc123" })).unwrap();
        ledger.flush_pending().unwrap();

        assert_eq!(ledger.find_marker("abc123"), MarkerSearch::hit(2));
        assert!(!ledger.find_marker("doesnotexist").found);

        let summary = ledger.summary();
        assert_eq!(summary.length, 3);
        assert_eq!(summary.height, 2);
        assert_eq!(summary.committed_entries, 1);
        assert!(summary.valid);
    }
}
