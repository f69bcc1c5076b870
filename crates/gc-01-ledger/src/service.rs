//! Concrete Ledger Service Implementation
//!
//! Wraps a [`Ledger`] for shared use from async code. Reads take the lock
//! briefly and clone out what they need. Flushes are serialised by a commit
//! gate and run the nonce search on the blocking pool with no lock held, so
//! lookups and submissions keep working while a block is being mined.

use crate::{
    config::LedgerConfig,
    domain::{
        serialize_entries, Block, BlockRecord, ChainSummary, IntegrityVerifier, Ledger,
        MarkerSearch,
    },
    error::{LedgerError, Result},
    events::LedgerEvent,
    metrics::Metrics,
    ports::{BlockArchive, LedgerApi},
};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

/// Shared, async-facing ledger
pub struct LedgerService {
    /// Chain and pending buffer
    ledger: Arc<RwLock<Ledger>>,

    /// Held for the whole of a flush: one nonce search in flight at a time
    commit_gate: Mutex<()>,

    /// Cancel flag of the flush currently mining; replaced by every flush
    cancel: parking_lot::Mutex<Arc<AtomicBool>>,

    /// Outbound event channel
    events: broadcast::Sender<LedgerEvent>,

    /// Counters
    metrics: Arc<Metrics>,

    /// Settings the ledger was built with
    config: LedgerConfig,
}

impl LedgerService {
    /// Create a service around a fresh ledger
    pub fn new(config: LedgerConfig) -> Result<Self> {
        let ledger = Ledger::with_config(&config)?;
        info!("[gc-01] Initializing Ledger Service");
        info!("  Difficulty: {}", config.difficulty);
        info!("  Nonce cap: {:?}", config.max_nonce_iterations);
        Ok(Self::from_ledger(ledger, config))
    }

    /// Create a service around a chain loaded from an archive
    ///
    /// An empty archive yields a fresh ledger. A chain that fails validation
    /// is still loaded so it can be inspected; a warning is logged.
    pub fn restore(archive: &dyn BlockArchive, config: LedgerConfig) -> Result<Self> {
        config.validate()?;
        let records = archive.load()?;
        let ledger = Ledger::from_transferable_with_config(records, &config);
        if let Err(violation) = ledger.validate() {
            warn!(%violation, "Restored chain failed validation");
        }
        info!(blocks = ledger.len(), "[gc-01] Ledger Service restored");
        Ok(Self::from_ledger(ledger, config))
    }

    fn from_ledger(ledger: Ledger, config: LedgerConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity);
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
            commit_gate: Mutex::new(()),
            cancel: parking_lot::Mutex::new(Arc::new(AtomicBool::new(false))),
            events,
            metrics: Arc::new(Metrics::new()),
            config,
        }
    }

    /// Write the current chain to `archive`, returning the block count
    pub fn checkpoint(&self, archive: &mut dyn BlockArchive) -> Result<usize> {
        let records = self.ledger.read().to_transferable();
        archive.store(&records)?;
        info!(blocks = records.len(), "Ledger checkpointed");
        Ok(records.len())
    }

    /// Receive events published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    /// Ask an in-flight nonce search to stop
    ///
    /// The flush that was mining returns [`LedgerError::MiningCancelled`]
    /// and its entries go back to the pending buffer.
    pub fn cancel_mining(&self) {
        self.cancel.lock().store(true, Ordering::SeqCst);
        debug!("Mining cancellation requested");
    }

    /// Service counters
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Settings the service was built with
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn publish(&self, event: LedgerEvent) {
        if self.events.send(event).is_err() {
            debug!("No event subscribers");
        }
    }

    fn restore_after_failure(&self, entries: Vec<Value>, error: &LedgerError) {
        let entry_count = entries.len() as u64;
        self.ledger.write().restore_pending(entries);
        self.metrics.record_mining_failure();
        warn!(%error, entry_count, "Flush failed, entries returned to pending");
        self.publish(LedgerEvent::mining_failed(entry_count, error.to_string()));
    }
}

/// Entries drained for a flush that has not been appended yet
///
/// If the flush future is dropped before it disarms the guard, the nonce
/// search is cancelled and the entries go back to the front of the pending
/// buffer.
struct DrainedEntries {
    ledger: Arc<RwLock<Ledger>>,
    cancel: Arc<AtomicBool>,
    entries: Option<Vec<Value>>,
}

impl DrainedEntries {
    fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    fn disarm(&mut self) -> Vec<Value> {
        self.entries.take().unwrap_or_default()
    }
}

impl Drop for DrainedEntries {
    fn drop(&mut self) {
        if let Some(entries) = self.entries.take() {
            self.cancel.store(true, Ordering::SeqCst);
            warn!(
                entry_count = entries.len(),
                "Flush abandoned, entries returned to pending"
            );
            self.ledger.write().restore_pending(entries);
        }
    }
}

#[async_trait]
impl LedgerApi for LedgerService {
    async fn submit_entry(&self, entry: Value) -> Result<()> {
        self.ledger.write().add_entry(entry)?;
        self.metrics.record_entry_submitted();
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn flush_pending(&self) -> Result<Option<Block>> {
        let _gate = self.commit_gate.lock().await;
        let cancel = Arc::new(AtomicBool::new(false));
        *self.cancel.lock() = Arc::clone(&cancel);

        let (candidate, mut drained, pow) = {
            let mut ledger = self.ledger.write();
            let entries = ledger.take_pending();
            if entries.is_empty() {
                return Ok(None);
            }
            let payload = match serialize_entries(&entries) {
                Ok(payload) => payload,
                Err(error) => {
                    ledger.restore_pending(entries);
                    return Err(error);
                }
            };
            let candidate = ledger.prepare_candidate(payload, entries.len() as u64);
            let guard = DrainedEntries {
                ledger: Arc::clone(&self.ledger),
                cancel: Arc::clone(&cancel),
                entries: Some(entries),
            };
            (candidate, guard, ledger.proof_of_work().clone())
        };

        debug!(
            index = candidate.index,
            entries = drained.len(),
            "Mining block"
        );

        let started = Instant::now();
        let job = candidate.clone();
        let mined = tokio::task::spawn_blocking(move || job.mine(&pow, &cancel))
            .await
            .map_err(|e| LedgerError::Internal(format!("mining task failed: {e}")))
            .and_then(|outcome| outcome);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let appended = mined.and_then(|outcome| {
            let attempts = outcome.attempts;
            self.ledger
                .write()
                .append_mined(candidate, outcome)
                .map(|block| (block, attempts))
        });

        let entries = drained.disarm();
        match appended {
            Ok((block, attempts)) => {
                self.metrics
                    .record_block_mined(block.entry_count(), attempts, elapsed_ms);
                self.publish(LedgerEvent::block_appended(
                    block.index(),
                    block.hash(),
                    block.entry_count(),
                    block.nonce(),
                    attempts,
                    elapsed_ms,
                ));
                Ok(Some(block))
            }
            Err(error) => {
                self.restore_after_failure(entries, &error);
                Err(error)
            }
        }
    }

    async fn pending_count(&self) -> usize {
        self.ledger.read().pending().len()
    }

    async fn recent_blocks(&self, count: usize) -> Vec<Block> {
        self.ledger.read().recent_blocks(count)
    }

    async fn block_by_index(&self, index: u64) -> Option<Block> {
        self.ledger.read().block_by_index(index).cloned()
    }

    async fn block_by_hash(&self, hash: &str) -> Option<Block> {
        self.ledger.read().block_by_hash(hash).cloned()
    }

    async fn blocks_newest_first(&self) -> Vec<Block> {
        self.ledger.read().blocks_newest_first()
    }

    async fn is_chain_valid(&self) -> bool {
        self.ledger.read().is_chain_valid()
    }

    async fn verify_records(&self, records: &[BlockRecord]) -> bool {
        IntegrityVerifier::new(self.config.difficulty).verify_chain(records)
    }

    async fn export_records(&self) -> Vec<BlockRecord> {
        self.ledger.read().to_transferable()
    }

    async fn find_marker(&self, marker: &str) -> MarkerSearch {
        self.ledger.read().find_marker(marker)
    }

    async fn summary(&self) -> ChainSummary {
        self.ledger.read().summary()
    }
}
