//! Chain export to a JSON file.

use anyhow::{Context, Result};
use gc_01_ledger::LedgerApi;
use std::path::Path;

/// Write every block as a JSON array of transfer records, returning the
/// number of blocks written.
pub async fn export_chain<L: LedgerApi + ?Sized>(ledger: &L, path: &Path) -> Result<usize> {
    let records = ledger.export_records().await;
    let json = serde_json::to_string_pretty(&records).context("Failed to encode chain")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write chain to {}", path.display()))?;
    tracing::info!(blocks = records.len(), path = %path.display(), "Chain exported");
    Ok(records.len())
}
