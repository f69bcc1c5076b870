//! Proof-of-work nonce search
//!
//! Linear search from nonce 0: the first nonce whose block hash carries
//! `difficulty` leading zero digits wins, so the result is reproducible
//! and minimal for identical inputs. Expected cost is `16^difficulty`
//! attempts; keep difficulty in 1..=3 for tests and demos.

use crate::error::{LedgerError, Result};
use crate::utils::hashing::{block_prefix_hasher, finish_with_nonce, meets_difficulty};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};

/// How often the cancellation flag is polled
const CANCEL_CHECK_INTERVAL: u64 = 1024;

/// Result of a successful nonce search
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MiningOutcome {
    /// Smallest nonce satisfying the difficulty predicate
    pub nonce: u64,
    /// Block hash produced by that nonce
    pub hash: String,
    /// Number of nonces hashed, including the winning one
    pub attempts: u64,
}

/// PoW nonce search service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: u32,
    max_iterations: Option<u64>,
}

impl ProofOfWork {
    /// Create an unbounded miner for the given difficulty
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            max_iterations: None,
        }
    }

    /// Cap the number of nonces tried per search
    pub fn with_max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Required leading zero digits
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Configured iteration cap
    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    /// Search for the smallest valid nonce
    pub fn mine(
        &self,
        index: u64,
        previous_hash: &str,
        timestamp: DateTime<Utc>,
        payload: &str,
    ) -> Result<MiningOutcome> {
        let never = AtomicBool::new(false);
        self.mine_cancellable(index, previous_hash, timestamp, payload, &never)
    }

    /// Search for the smallest valid nonce, giving up when `cancel` is raised
    #[tracing::instrument(skip(self, previous_hash, payload, cancel), fields(difficulty = self.difficulty))]
    pub fn mine_cancellable(
        &self,
        index: u64,
        previous_hash: &str,
        timestamp: DateTime<Utc>,
        payload: &str,
        cancel: &AtomicBool,
    ) -> Result<MiningOutcome> {
        let prefix = block_prefix_hasher(index, previous_hash, timestamp.timestamp_millis(), payload);
        let mut nonce: u64 = 0;

        loop {
            if let Some(cap) = self.max_iterations {
                if nonce >= cap {
                    tracing::warn!(
                        attempts = nonce,
                        "PoW search exhausted without meeting difficulty"
                    );
                    return Err(LedgerError::MiningExhausted {
                        difficulty: self.difficulty,
                        attempts: nonce,
                    });
                }
            }

            if nonce % CANCEL_CHECK_INTERVAL == 0 && cancel.load(Ordering::Relaxed) {
                tracing::debug!(attempts = nonce, "PoW search cancelled");
                return Err(LedgerError::MiningCancelled);
            }

            let hash = finish_with_nonce(&prefix, nonce);
            if meets_difficulty(&hash, self.difficulty) {
                tracing::debug!(nonce, "PoW search successful");
                return Ok(MiningOutcome {
                    nonce,
                    hash,
                    attempts: nonce + 1,
                });
            }

            nonce = nonce.checked_add(1).ok_or(LedgerError::MiningExhausted {
                difficulty: self.difficulty,
                attempts: u64::MAX,
            })?;
        }
    }

    /// Check a nonce against this miner's difficulty
    pub fn check_nonce(
        &self,
        index: u64,
        previous_hash: &str,
        timestamp: DateTime<Utc>,
        payload: &str,
        nonce: u64,
    ) -> bool {
        let prefix = block_prefix_hasher(index, previous_hash, timestamp.timestamp_millis(), payload);
        meets_difficulty(&finish_with_nonce(&prefix, nonce), self.difficulty)
    }
}
