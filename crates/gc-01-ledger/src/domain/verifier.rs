//! Standalone integrity verification
//!
//! Validates chains supplied as plain data (freshly loaded from external
//! storage, for example) without a live [`Ledger`](super::Ledger), and
//! scans block payloads for a marker value.

use super::block::Block;
use super::invariants::{check_self_hash, check_sequence, check_work, ChainViolation};
use super::transfer::{blocks_from_records, BlockRecord};
use serde::Serialize;
use serde_json::Value;

/// Entry field compared against the marker in structured payloads
pub const MARKER_FIELD: &str = "hash";

/// Outcome of a payload marker search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MarkerSearch {
    /// Whether any payload matched
    pub found: bool,
    /// Position of the first matching payload
    pub index: Option<usize>,
}

impl MarkerSearch {
    /// A hit at the given position
    pub fn hit(index: usize) -> Self {
        Self {
            found: true,
            index: Some(index),
        }
    }

    /// No payload matched
    pub fn miss() -> Self {
        Self::default()
    }
}

/// Chain verifier for a fixed difficulty
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntegrityVerifier {
    difficulty: u32,
}

impl IntegrityVerifier {
    /// Create a verifier requiring `difficulty` leading zero digits
    pub fn new(difficulty: u32) -> Self {
        Self { difficulty }
    }

    /// Required leading zero digits
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Verify a chain given as transfer records
    ///
    /// Records are sorted by index first. Empty input is valid.
    pub fn verify_chain(&self, records: &[BlockRecord]) -> bool {
        self.diagnose_chain(records).is_ok()
    }

    /// Like [`verify_chain`](Self::verify_chain), reporting the first violation
    pub fn diagnose_chain(&self, records: &[BlockRecord]) -> Result<(), ChainViolation> {
        let blocks = blocks_from_records(records.iter().cloned());
        self.diagnose_blocks(&blocks)
    }

    fn diagnose_blocks(&self, blocks: &[Block]) -> Result<(), ChainViolation> {
        let mut sorted = blocks.to_vec();
        sorted.sort_by_key(|block| block.index());
        let result = check_sequence(&sorted, self.difficulty);
        if let Err(violation) = &result {
            tracing::warn!(%violation, "Chain verification failed");
        }
        result
    }

    /// Verify a single block: stored hash matches fields AND difficulty holds
    pub fn verify_block(&self, block: &Block) -> bool {
        check_self_hash(block).is_ok() && check_work(block, self.difficulty).is_ok()
    }
}

/// Scan payloads for a marker
///
/// Each payload that parses as a JSON array matches when any element has a
/// `"hash"` field equal to `marker`. A payload that does not parse as JSON
/// falls back to substring containment. Parsed payloads that do not match
/// are skipped without the fallback.
pub fn search_payload_for_marker<I, S>(payloads: I, marker: &str) -> MarkerSearch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    payloads
        .into_iter()
        .position(|payload| payload_contains_marker(payload.as_ref(), marker))
        .map(MarkerSearch::hit)
        .unwrap_or_else(MarkerSearch::miss)
}

fn payload_contains_marker(payload: &str, marker: &str) -> bool {
    match serde_json::from_str::<Value>(payload) {
        Ok(Value::Array(entries)) => entries.iter().any(|entry| {
            entry
                .get(MARKER_FIELD)
                .and_then(Value::as_str)
                .is_some_and(|value| value == marker)
        }),
        Ok(_) => false,
        Err(_) => payload.contains(marker),
    }
}
