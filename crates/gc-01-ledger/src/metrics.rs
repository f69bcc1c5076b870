//! Metrics collection for the ledger subsystem

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for the ledger service
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total blocks appended (genesis excluded)
    pub blocks_mined: AtomicU64,

    /// Total entries sealed into blocks
    pub entries_committed: AtomicU64,

    /// Total entries submitted
    pub entries_submitted: AtomicU64,

    /// Total nonces tried across successful searches
    pub nonce_attempts: AtomicU64,

    /// Total PoW mining time (milliseconds)
    pub mining_time_ms: AtomicU64,

    /// Searches that were cancelled or exhausted
    pub mining_failures: AtomicU64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a submitted entry
    pub fn record_entry_submitted(&self) {
        self.entries_submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an appended block
    pub fn record_block_mined(&self, entry_count: u64, attempts: u64, duration_ms: u64) {
        self.blocks_mined.fetch_add(1, Ordering::Relaxed);
        self.entries_committed
            .fetch_add(entry_count, Ordering::Relaxed);
        self.nonce_attempts.fetch_add(attempts, Ordering::Relaxed);
        self.mining_time_ms.fetch_add(duration_ms, Ordering::Relaxed);
    }

    /// Record a failed search
    pub fn record_mining_failure(&self) {
        self.mining_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get blocks mined
    pub fn get_blocks_mined(&self) -> u64 {
        self.blocks_mined.load(Ordering::Relaxed)
    }

    /// Get entries submitted
    pub fn get_entries_submitted(&self) -> u64 {
        self.entries_submitted.load(Ordering::Relaxed)
    }

    /// Get mining failures
    pub fn get_mining_failures(&self) -> u64 {
        self.mining_failures.load(Ordering::Relaxed)
    }

    /// Get average entries per block
    pub fn get_avg_entries_per_block(&self) -> f64 {
        self.per_block(&self.entries_committed)
    }

    /// Get average nonce attempts per block
    pub fn get_avg_attempts_per_block(&self) -> f64 {
        self.per_block(&self.nonce_attempts)
    }

    /// Get average mining time (milliseconds)
    pub fn get_avg_mining_time(&self) -> f64 {
        self.per_block(&self.mining_time_ms)
    }

    fn per_block(&self, total: &AtomicU64) -> f64 {
        let blocks = self.blocks_mined.load(Ordering::Relaxed);
        if blocks == 0 {
            return 0.0;
        }
        total.load(Ordering::Relaxed) as f64 / blocks as f64
    }
}
