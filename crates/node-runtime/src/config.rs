//! # Node Configuration
//!
//! Command-line arguments with environment fallbacks. Every flag can be set
//! through the `GC_*` variable named in its help text.

use crate::recorder::CommitPolicy;
use clap::Parser;
use gc_01_ledger::LedgerConfig;
use gov_telemetry::TelemetryConfig;
use std::path::PathBuf;

/// Complete node configuration.
#[derive(Parser, Debug, Clone)]
#[command(name = "node-runtime")]
#[command(about = "GovChain ledger node: records public-sector entries on a proof-of-work chain")]
pub struct NodeConfig {
    /// Leading zero hex digits required in every mined block hash
    #[arg(long, env = "GC_DIFFICULTY", default_value_t = gc_01_ledger::DEFAULT_DIFFICULTY)]
    pub difficulty: u32,

    /// Nonces tried per block before giving up (0 = unbounded)
    #[arg(long, env = "GC_MAX_NONCE_ITERATIONS", default_value_t = 50_000_000)]
    pub max_nonce_iterations: u64,

    /// Payload literal of the genesis block
    #[arg(long, env = "GC_GENESIS_PAYLOAD", default_value = gc_01_ledger::GENESIS_PAYLOAD)]
    pub genesis_payload: String,

    /// When entries are sealed: "each", "manual" or "batch:<n>"
    #[arg(long, env = "GC_COMMIT_POLICY", default_value = "each")]
    pub commit_policy: CommitPolicy,

    /// Write the final chain as JSON transfer records to this file
    #[arg(long, env = "GC_EXPORT_PATH")]
    pub export_path: Option<PathBuf>,

    /// Key for illustrative HMAC signatures on issued identities
    #[arg(long, env = "GC_SIGNING_KEY", default_value = "govchain-demo-key")]
    pub signing_key: String,

    /// Log level filter
    #[arg(long, env = "GC_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit JSON log lines
    #[arg(long, env = "GC_JSON_LOGS")]
    pub json_logs: bool,
}

impl NodeConfig {
    /// Ledger settings derived from the arguments.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            difficulty: self.difficulty,
            max_nonce_iterations: (self.max_nonce_iterations > 0)
                .then_some(self.max_nonce_iterations),
            genesis_payload: self.genesis_payload.clone(),
            ..LedgerConfig::default()
        }
    }

    /// Telemetry settings: environment first, overridden by the arguments.
    pub fn telemetry_config(&self) -> TelemetryConfig {
        let mut config = TelemetryConfig::from_env();
        config.log_level = self.log_level.clone();
        config.json_logs = config.json_logs || self.json_logs;
        config
    }
}
