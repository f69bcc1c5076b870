//! Outbound ports (driven side - SPI)

use crate::domain::BlockRecord;
use crate::error::Result;

/// Port: persistence boundary for transfer records
///
/// The ledger never reads or writes storage on its own; callers checkpoint
/// and restore through an implementation of this trait.
pub trait BlockArchive: Send + Sync {
    /// Replace the archived chain with `records`
    fn store(&mut self, records: &[BlockRecord]) -> Result<()>;

    /// Load the archived chain (empty if nothing stored)
    fn load(&self) -> Result<Vec<BlockRecord>>;
}
