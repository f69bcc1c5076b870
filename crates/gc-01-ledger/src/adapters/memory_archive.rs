use crate::domain::BlockRecord;
use crate::error::Result;
use crate::ports::outbound::BlockArchive;

/// In-memory block archive for tests and the demo runtime.
///
/// Records are kept as a JSON document so a checkpoint goes through the
/// same wire form an external store would see.
#[derive(Debug, Default)]
pub struct InMemoryBlockArchive {
    document: Option<String>,
    stores: u64,
}

impl InMemoryBlockArchive {
    /// Empty archive
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive pre-seeded with a JSON document
    pub fn from_json(document: impl Into<String>) -> Self {
        Self {
            document: Some(document.into()),
            stores: 0,
        }
    }

    /// The archived JSON document, if any
    pub fn as_json(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// Number of successful `store` calls
    pub fn store_count(&self) -> u64 {
        self.stores
    }
}

impl BlockArchive for InMemoryBlockArchive {
    fn store(&mut self, records: &[BlockRecord]) -> Result<()> {
        self.document = Some(serde_json::to_string_pretty(records)?);
        self.stores += 1;
        tracing::debug!(blocks = records.len(), "Chain archived");
        Ok(())
    }

    fn load(&self) -> Result<Vec<BlockRecord>> {
        match &self.document {
            Some(document) => Ok(serde_json::from_str(document)?),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Ledger;
    use crate::error::LedgerError;

    #[test]
    fn test_empty_archive_loads_nothing() {
        let archive = InMemoryBlockArchive::new();
        assert!(archive.load().unwrap().is_empty());
        assert!(archive.as_json().is_none());
    }

    #[test]
    fn test_store_then_load() {
        let mut ledger = Ledger::new(1);
        ledger.add_block("one", 1).unwrap();
        let records = ledger.to_transferable();

        let mut archive = InMemoryBlockArchive::new();
        archive.store(&records).unwrap();

        assert_eq!(archive.load().unwrap(), records);
        assert_eq!(archive.store_count(), 1);
        assert!(archive.as_json().unwrap().contains("previousHash"));
    }

    #[test]
    fn test_corrupt_document_is_serialization_error() {
        let archive = InMemoryBlockArchive::from_json("not json");
        assert!(matches!(
            archive.load(),
            Err(LedgerError::Serialization(_))
        ));
    }
}
