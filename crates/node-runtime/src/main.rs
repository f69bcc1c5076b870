//! # GovChain Node Runtime
//!
//! Entry point for a single-writer GovChain ledger node.
//!
//! ## Startup Sequence
//!
//! 1. Parse configuration (arguments, then `GC_*` environment variables)
//! 2. Install logging
//! 3. Build the ledger service (creates the genesis block)
//! 4. Forward ledger events to the log
//! 5. Run the demonstration session under the configured commit policy
//! 6. Verify the chain and optionally export it as JSON

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, warn};

use gc_01_ledger::utils::display_hash;
use gc_01_ledger::{LedgerApi, LedgerEvent, LedgerService};
use gov_telemetry::init_telemetry;
use node_runtime::{export_chain, run_demo_session, NodeConfig};

/// Log every ledger event until the channel closes.
fn spawn_event_logger(service: &LedgerService) -> tokio::task::JoinHandle<()> {
    let mut events = service.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(LedgerEvent::BlockAppended {
                    index,
                    hash,
                    nonce,
                    attempts,
                    mining_time_ms,
                    ..
                }) => {
                    gov_telemetry::log_block_event!(
                        info,
                        "ledger",
                        "Block appended",
                        index,
                        hash,
                        nonce,
                        attempts,
                        mining_time_ms
                    );
                }
                Ok(LedgerEvent::MiningFailed { reason, entry_count, .. }) => {
                    gov_telemetry::log_event!(
                        warn,
                        "ledger",
                        "Mining failed",
                        entry_count,
                        reason = %reason
                    );
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Event logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::parse();
    let _telemetry = init_telemetry(config.telemetry_config())
        .context("Failed to initialize telemetry")?;

    info!("===========================================");
    info!("  GovChain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("  Difficulty: {}", config.difficulty);
    info!("  Commit policy: {}", config.commit_policy);
    info!("===========================================");

    let service = Arc::new(
        LedgerService::new(config.ledger_config()).context("Failed to create ledger service")?,
    );
    let event_logger = spawn_event_logger(&service);

    let report = run_demo_session(
        Arc::clone(&service),
        config.commit_policy,
        &config.signing_key,
    )
    .await
    .context("Demo session failed")?;

    let summary = service.summary().await;
    info!(
        height = summary.height,
        tip = %display_hash(&summary.tip_hash),
        entries = summary.committed_entries,
        document = %report.document_hash,
        document_block = ?report.document_block,
        "Ledger ready"
    );

    if let Some(path) = &config.export_path {
        export_chain(service.as_ref(), path).await?;
    }

    let metrics = service.metrics();
    info!(
        blocks = metrics.get_blocks_mined(),
        avg_attempts = metrics.get_avg_attempts_per_block(),
        avg_mining_ms = metrics.get_avg_mining_time(),
        "Mining statistics"
    );

    drop(service);
    event_logger.abort();

    if !report.chain_valid {
        bail!("Chain failed validation after the demo session");
    }
    Ok(())
}
