//! # GovChain - Ledger Core (Subsystem 01)
//!
//! **Bounded Context:** Block Sealing & Chain Custody
//!
//! ## Purpose
//!
//! The ledger is the only component of GovChain with real algorithmic
//! content. It keeps an ordered chain of hash-linked blocks and is
//! responsible for:
//! - Buffering opaque entries submitted by the application layer
//! - Sealing buffered entries into a new block via proof-of-work
//! - Validating chain-of-custody (self-hashes, linkage, difficulty)
//! - Looking blocks up by index, hash, recency or payload marker
//!
//! ## Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Service / Adapters (Outer)                         │
//! │  - LedgerService: async wrapper, mining off-thread  │
//! │  - InMemoryBlockArchive: persistence boundary       │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Ports (Middle)                                     │
//! │  - Inbound: LedgerApi                               │
//! │  - Outbound: BlockArchive                           │
//! └─────────────────────────────────────────────────────┘
//!                         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain (Inner - Pure Logic)                        │
//! │  - Block, ProofOfWork, Ledger                       │
//! │  - IntegrityVerifier, BlockRecord                   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Critical Invariants
//!
//! 1. **Self-Hash**: `block.hash == SHA-256(index ‖ previous_hash ‖ timestamp ‖ payload ‖ nonce)`
//! 2. **Linkage**: `chain[i].previous_hash == chain[i-1].hash`
//! 3. **Difficulty**: every non-genesis hash has `difficulty` leading `'0'` digits
//! 4. **Contiguity**: indices run 0..N with no gaps
//! 5. **Append-Only**: blocks are never reordered or removed
//!
//! ## Usage Example
//!
//! ```rust
//! use gc_01_ledger::Ledger;
//! use serde_json::json;
//!
//! let mut ledger = Ledger::new(1);
//! ledger.add_entry(json!({ "department": "Health", "amount": 100 })).unwrap();
//! let block = ledger.flush_pending().unwrap().expect("one entry pending");
//!
//! assert_eq!(block.index(), 1);
//! assert!(block.hash().starts_with('0'));
//! assert!(ledger.is_chain_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Persistence boundary adapters
pub mod adapters;
/// Domain models and ledger logic
pub mod domain;
/// Event type definitions
pub mod events;
pub mod ports;
pub mod service;
pub mod utils;

mod config;
mod error;
mod metrics;

pub use config::LedgerConfig;
pub use error::{LedgerError, Result};
pub use metrics::Metrics;

pub use domain::{
    create_genesis_block, search_payload_for_marker, Block, BlockCandidate, BlockRecord,
    ChainSummary, ChainViolation, IntegrityVerifier, Ledger, MarkerSearch, MiningOutcome,
    ProofOfWork,
};

pub use ports::{BlockArchive, LedgerApi};

pub use adapters::InMemoryBlockArchive;

pub use events::LedgerEvent;

pub use service::LedgerService;

/// Subsystem identifier used in log fields
pub const SUBSYSTEM_ID: u8 = 1;

/// Default proof-of-work difficulty (leading zero hex digits)
pub const DEFAULT_DIFFICULTY: u32 = 2;

/// Maximum meaningful difficulty: a SHA-256 hex digest has 64 digits
pub const MAX_DIFFICULTY: u32 = 64;

/// Payload literal carried by the genesis block
pub const GENESIS_PAYLOAD: &str = "Genesis Block";

/// Sentinel previous-hash of the genesis block
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Default number of blocks returned by recent-block queries
pub const DEFAULT_RECENT_BLOCKS: usize = 5;
