//! # Ledger Recorder
//!
//! Bridges typed [`LedgerEntry`] values from the application layer to the
//! ledger service and decides when pending entries are sealed into a block.

use gc_01_ledger::{Block, LedgerApi, LedgerError};
use gc_records::{LedgerEntry, RecordError};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// Recorder errors.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The ledger rejected the entry or failed to seal a block
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    /// The entry could not be encoded
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// When pending entries are sealed into a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// One block per entry
    #[default]
    EachEntry,
    /// Seal once this many entries are pending
    Batch(usize),
    /// Only on an explicit [`LedgerRecorder::commit`]
    Manual,
}

impl fmt::Display for CommitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EachEntry => write!(f, "each"),
            Self::Batch(size) => write!(f, "batch:{size}"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Commit policy could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid commit policy {0:?}: expected \"each\", \"manual\" or \"batch:<n>\" with n > 0")]
pub struct ParsePolicyError(String);

impl FromStr for CommitPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "each" => Ok(Self::EachEntry),
            "manual" => Ok(Self::Manual),
            other => other
                .strip_prefix("batch:")
                .and_then(|n| n.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .map(Self::Batch)
                .ok_or_else(|| ParsePolicyError(s.to_string())),
        }
    }
}

/// Records typed entries and flushes them according to a [`CommitPolicy`].
pub struct LedgerRecorder<L: LedgerApi + ?Sized> {
    ledger: Arc<L>,
    policy: CommitPolicy,
}

impl<L: LedgerApi + ?Sized> LedgerRecorder<L> {
    /// Create a recorder over `ledger`
    pub fn new(ledger: Arc<L>, policy: CommitPolicy) -> Self {
        Self { ledger, policy }
    }

    /// The active commit policy
    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Submit an entry, sealing a block if the policy says so
    ///
    /// Returns the sealed block, if any.
    pub async fn record(&self, entry: &LedgerEntry) -> Result<Option<Block>, RecorderError> {
        let value = entry.to_value()?;
        self.ledger.submit_entry(value).await?;
        gov_telemetry::log_entry_event!(
            debug,
            "recorder",
            "Entry recorded",
            entry.marker(),
            kind = entry.kind()
        );

        let due = match self.policy {
            CommitPolicy::EachEntry => true,
            CommitPolicy::Batch(size) => self.ledger.pending_count().await >= size,
            CommitPolicy::Manual => false,
        };
        if due {
            self.commit().await
        } else {
            Ok(None)
        }
    }

    /// Seal whatever is pending now
    pub async fn commit(&self) -> Result<Option<Block>, RecorderError> {
        Ok(self.ledger.flush_pending().await?)
    }
}

/// Where a document hash was found on the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DocumentVerification {
    /// Whether the hash appears in any committed block
    pub found: bool,
    /// Index of the first block carrying it
    pub block_index: Option<u64>,
}

/// Look a document hash up across committed blocks
pub async fn verify_document<L: LedgerApi + ?Sized>(ledger: &L, hash: &str) -> DocumentVerification {
    let search = ledger.find_marker(hash).await;
    let block_index = match search.index {
        Some(position) => ledger
            .export_records()
            .await
            .get(position)
            .map(|record| record.index),
        None => None,
    };
    DocumentVerification {
        found: search.found,
        block_index,
    }
}
