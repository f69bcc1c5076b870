//! # Integration Test Flows
//!
//! Tests that gc-records, node-runtime and gc-01-ledger work together:
//!
//! 1. **Records -> Recorder -> Ledger**: typed entries are sealed into blocks
//!    according to the commit policy
//! 2. **Ledger -> Archive -> Ledger**: a checkpointed chain restores intact
//! 3. **Archive -> Verifier**: a chain loaded as plain data verifies standalone
//! 4. **Events**: every sealed block is announced on the event channel

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use tokio::time::timeout;

    use gc_01_ledger::{
        BlockArchive, InMemoryBlockArchive, IntegrityVerifier, LedgerApi, LedgerConfig,
        LedgerEvent, LedgerService,
    };
    use gc_records::{
        DocumentRecord, IdentityRecord, IdentityRevocation, LedgerEntry, TransactionRecord,
        TransactionStatus,
    };
    use node_runtime::{verify_document, CommitPolicy, LedgerRecorder};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn service(difficulty: u32) -> Arc<LedgerService> {
        Arc::new(LedgerService::new(LedgerConfig::with_difficulty(difficulty)).unwrap())
    }

    fn budget_entries() -> Vec<LedgerEntry> {
        let now = Utc::now();
        [
            ("Department of Health", 123_456),
            ("Department of Education", 500_000),
            ("Public Works", 75_000),
            ("Transport Authority", 1_245_300),
        ]
        .into_iter()
        .map(|(entity, amount)| {
            TransactionRecord::new("Allocation", entity, amount, TransactionStatus::Confirmed, now)
                .into()
        })
        .collect()
    }

    // =============================================================================
    // RECORDS -> RECORDER -> LEDGER
    // =============================================================================

    #[tokio::test]
    async fn test_batched_budget_entries_seal_into_two_blocks() {
        let ledger = service(1);
        let recorder = LedgerRecorder::new(Arc::clone(&ledger), CommitPolicy::Batch(2));

        let mut sealed = Vec::new();
        for entry in budget_entries() {
            if let Some(block) = recorder.record(&entry).await.unwrap() {
                sealed.push(block);
            }
        }

        assert_eq!(sealed.len(), 2);
        assert!(sealed.iter().all(|block| block.entry_count() == 2));
        assert_eq!(sealed[1].previous_hash(), sealed[0].hash());

        let summary = ledger.summary().await;
        assert_eq!(summary.height, 2);
        assert_eq!(summary.committed_entries, 4);
        assert_eq!(summary.pending_entries, 0);
        assert!(summary.valid);
    }

    #[tokio::test]
    async fn test_identity_lifecycle_is_searchable() {
        let ledger = service(1);
        let recorder = LedgerRecorder::new(Arc::clone(&ledger), CommitPolicy::EachEntry);

        let identity = IdentityRecord::new("GOV-0042", "R. Okafor", "Registry", "clerk", Utc::now());
        let revocation = IdentityRevocation::of(&identity, Utc::now(), None);

        recorder.record(&identity.clone().into()).await.unwrap();
        recorder.record(&revocation.into()).await.unwrap();

        // First block carrying the identity hash is the issuance
        let hit = verify_document(ledger.as_ref(), &identity.hash).await;
        assert!(hit.found);
        assert_eq!(hit.block_index, Some(1));

        let newest = ledger.blocks_newest_first().await;
        assert!(newest[0].payload().contains("identity_revoked"));
    }

    // =============================================================================
    // LEDGER -> ARCHIVE -> LEDGER / VERIFIER
    // =============================================================================

    #[tokio::test]
    async fn test_checkpoint_restore_and_standalone_verification() {
        let ledger = service(2);
        let recorder = LedgerRecorder::new(Arc::clone(&ledger), CommitPolicy::EachEntry);
        let document = DocumentRecord::from_content("Safety Report Q2.pdf", b"report", Utc::now());
        recorder.record(&document.clone().into()).await.unwrap();

        let mut archive = InMemoryBlockArchive::new();
        ledger.checkpoint(&mut archive).unwrap();

        let records = archive.load().unwrap();
        assert!(IntegrityVerifier::new(2).verify_chain(&records));

        let restored = Arc::new(LedgerService::restore(&archive, LedgerConfig::with_difficulty(2)).unwrap());
        assert!(restored.is_chain_valid().await);
        assert!(verify_document(restored.as_ref(), &document.hash).await.found);

        // The restored ledger keeps extending the same chain
        restored
            .submit_entry(serde_json::json!({ "hash": "after-restart" }))
            .await
            .unwrap();
        let block = restored.flush_pending().await.unwrap().unwrap();
        assert_eq!(block.index(), 2);
        assert!(restored.is_chain_valid().await);
    }

    // =============================================================================
    // EVENTS
    // =============================================================================

    #[tokio::test]
    async fn test_each_sealed_block_is_announced() {
        let ledger = service(1);
        let mut events = ledger.subscribe();
        let recorder = LedgerRecorder::new(Arc::clone(&ledger), CommitPolicy::EachEntry);

        for entry in budget_entries().into_iter().take(3) {
            recorder.record(&entry).await.unwrap();
        }

        for expected in 1..=3u64 {
            let event = timeout(Duration::from_secs(1), events.recv())
                .await
                .expect("event within timeout")
                .unwrap();
            match event {
                LedgerEvent::BlockAppended { index, entry_count, .. } => {
                    assert_eq!(index, expected);
                    assert_eq!(entry_count, 1);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_all_committed() {
        let ledger = service(1);
        let mut handles = Vec::new();
        for n in 0..16u64 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                ledger
                    .submit_entry(serde_json::json!({ "hash": format!("entry-{n}") }))
                    .await
                    .unwrap();
                ledger.flush_pending().await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        ledger.flush_pending().await.unwrap();

        let summary = ledger.summary().await;
        assert_eq!(summary.committed_entries, 16);
        assert_eq!(summary.pending_entries, 0);
        assert!(summary.valid);
        for n in 0..16u64 {
            assert!(ledger.find_marker(&format!("entry-{n}")).await.found);
        }
    }
}
