//! # Chain-of-Custody Tests
//!
//! Archived chains are edited the way an attacker with storage access would
//! edit them, then restored. Every edit must surface as a validation failure
//! naming the block it happened at.

#[cfg(test)]
mod tests {
    use gc_01_ledger::{
        BlockArchive, BlockRecord, ChainViolation, InMemoryBlockArchive, IntegrityVerifier,
        LedgerApi, LedgerConfig, LedgerService,
    };
    use serde_json::{json, Value};

    async fn archived_chain(difficulty: u32, blocks: u64) -> InMemoryBlockArchive {
        let service = LedgerService::new(LedgerConfig::with_difficulty(difficulty)).unwrap();
        for n in 0..blocks {
            service
                .submit_entry(json!({ "hash": format!("doc-{n}"), "amount": n * 100 }))
                .await
                .unwrap();
            service.flush_pending().await.unwrap();
        }
        let mut archive = InMemoryBlockArchive::new();
        service.checkpoint(&mut archive).unwrap();
        archive
    }

    fn edit(archive: &InMemoryBlockArchive, change: impl FnOnce(&mut Vec<Value>)) -> InMemoryBlockArchive {
        let mut document: Vec<Value> =
            serde_json::from_str(archive.as_json().unwrap()).unwrap();
        change(&mut document);
        InMemoryBlockArchive::from_json(serde_json::to_string(&document).unwrap())
    }

    #[tokio::test]
    async fn test_untouched_archive_restores_valid() {
        let archive = archived_chain(1, 3).await;
        let restored = LedgerService::restore(&archive, LedgerConfig::with_difficulty(1)).unwrap();
        assert!(restored.is_chain_valid().await);
        assert_eq!(restored.summary().await.length, 4);
    }

    #[tokio::test]
    async fn test_edited_amount_is_detected() {
        let archive = archived_chain(1, 3).await;
        let forged = edit(&archive, |blocks| {
            blocks[2]["payload"] = Value::String(r#"[{"hash":"doc-1","amount":1}]"#.into());
        });

        let restored = LedgerService::restore(&forged, LedgerConfig::with_difficulty(1)).unwrap();
        assert!(!restored.is_chain_valid().await);

        let records = forged.load().unwrap();
        let violation = IntegrityVerifier::new(1).diagnose_chain(&records).unwrap_err();
        assert!(matches!(violation, ChainViolation::HashMismatch { index: 2, .. }));
    }

    #[tokio::test]
    async fn test_removed_block_is_detected() {
        let archive = archived_chain(1, 3).await;
        let forged = edit(&archive, |blocks| {
            blocks.remove(2);
        });

        let violation = IntegrityVerifier::new(1)
            .diagnose_chain(&forged.load().unwrap())
            .unwrap_err();
        assert_eq!(
            violation,
            ChainViolation::IndexGap {
                expected: 2,
                found: 3
            }
        );
    }

    #[tokio::test]
    async fn test_reordered_records_still_verify() {
        let archive = archived_chain(1, 3).await;
        let mut records: Vec<BlockRecord> = archive.load().unwrap();
        records.reverse();
        assert!(IntegrityVerifier::new(1).verify_chain(&records));
    }

    #[tokio::test]
    async fn test_stricter_difficulty_rejects_weaker_chain() {
        let archive = archived_chain(1, 4).await;
        let records = archive.load().unwrap();
        assert!(IntegrityVerifier::new(1).verify_chain(&records));
        assert!(!IntegrityVerifier::new(6).verify_chain(&records));
    }

    #[tokio::test]
    async fn test_rehashed_forgery_breaks_the_next_link() {
        let archive = archived_chain(0, 3).await;
        let mut records = archive.load().unwrap();

        // Recompute a consistent hash for the edited block with a fresh ledger
        let mut scratch = gc_01_ledger::Ledger::from_transferable(records[..1].to_vec(), 0);
        let forged_block = scratch.add_block("forged", 1).unwrap();
        records[1] = BlockRecord::from(&forged_block);

        let violation = IntegrityVerifier::new(0).diagnose_chain(&records).unwrap_err();
        assert!(matches!(violation, ChainViolation::BrokenLink { index: 2, .. }));
    }
}
