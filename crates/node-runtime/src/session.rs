//! # Demonstration Session
//!
//! Records one budget transaction, one document verification and one
//! identity issuance, then checks the chain and looks the document up.

use crate::recorder::{verify_document, CommitPolicy, LedgerRecorder, RecorderError};
use chrono::Utc;
use gc_01_ledger::LedgerApi;
use gc_records::{
    sign_message, DocumentRecord, IdentityRecord, LedgerEntry, TransactionRecord,
    TransactionStatus,
};
use std::sync::Arc;
use tracing::info;

/// Outcome of [`run_demo_session`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionReport {
    /// Blocks sealed during the session
    pub blocks_sealed: usize,
    /// Chain validity after the session
    pub chain_valid: bool,
    /// Hash of the verified document
    pub document_hash: String,
    /// Block index carrying the document, if committed
    pub document_block: Option<u64>,
    /// HMAC tag over the issued identity's identifier
    pub identity_signature: String,
}

/// Run the demonstration entries through `ledger` under `policy`.
///
/// Anything left pending by a batching or manual policy is committed at the
/// end so the document lookup sees it.
pub async fn run_demo_session<L: LedgerApi + ?Sized>(
    ledger: Arc<L>,
    policy: CommitPolicy,
    signing_key: &str,
) -> Result<SessionReport, RecorderError> {
    let recorder = LedgerRecorder::new(Arc::clone(&ledger), policy);
    let now = Utc::now();

    let transaction = TransactionRecord::new(
        "Allocation",
        "Department of Health",
        100,
        TransactionStatus::Confirmed,
        now,
    );
    let document =
        DocumentRecord::from_content("Budget Approval 2024.pdf", b"approved by council", now);
    let identity = IdentityRecord::new("GOV-0001", "Dana Reyes", "Treasury", "auditor", now);
    let identity_signature = sign_message(&identity.identifier, signing_key)?;

    let entries: Vec<LedgerEntry> = vec![
        transaction.into(),
        document.clone().into(),
        identity.into(),
    ];

    let mut blocks_sealed = 0;
    for entry in &entries {
        if recorder.record(entry).await?.is_some() {
            blocks_sealed += 1;
        }
    }
    if recorder.commit().await?.is_some() {
        blocks_sealed += 1;
    }

    let chain_valid = ledger.is_chain_valid().await;
    let verification = verify_document(ledger.as_ref(), &document.hash).await;
    info!(
        blocks_sealed,
        chain_valid,
        document_found = verification.found,
        "Demo session complete"
    );

    Ok(SessionReport {
        blocks_sealed,
        chain_valid,
        document_hash: document.hash,
        document_block: verification.block_index,
        identity_signature,
    })
}
